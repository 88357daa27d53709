use std::path::{Path, PathBuf};

/// Small supplier table in the French spreadsheet layout: semicolon
/// separated, decimal commas, fixed transport columns and an assembly row
/// carrying its own duration.
///
/// - `PCB`: air 21 days / sea 42 days, MOQ 100, lot 50.
/// - `Carte mère`: needs `PCB`; air 28 days / sea 56 days.
/// - `Boitier`: 14 days either way, sea is cheaper.
/// - assembly: 6 weeks from the `Semaines assemblage` column.
pub const SAMPLE_CSV: &str = "\
Composants;CU pour 200;CU pour 1000;CTA pour 200;CTB pour 200;Temps de prod pour 200;Délais de transport Avion;Délais de transport Bateau;MOQ;Lot;Devise;Semaines assemblage
PCB;5,50;5,00;0,50;0,20;2;1;4;100;50;EUR;
Carte mère;12;11;1;0,4;3;1;5;50;10;EUR;
Boitier;8;7,5;2;0,5;1;1;1;1;1;;
Assemblage et intégration final;0;0;0;0;0;0;0;1;1;;6
";

/// Config matching [`SAMPLE_CSV`].
pub const SAMPLE_CONFIG: &str = r#"
[dataset]
path = "composants.csv"

[assembly]
component_name = "Assemblage et intégration final"
duration_weeks = 8
duration_weeks_column = "Semaines assemblage"

[dependencies]
"Carte mère" = ["PCB"]
"Assemblage et intégration final" = ["Carte mère", "Boitier"]
"#;

/// Write the sample dataset and config into `dir`; returns the config path.
pub fn write_sample_project(dir: &Path) -> PathBuf {
    write_project(dir, SAMPLE_CONFIG, SAMPLE_CSV)
}

/// Write `config` as `Procureplan.toml` and `csv` as `composants.csv`.
pub fn write_project(dir: &Path, config: &str, csv: &str) -> PathBuf {
    std::fs::write(dir.join("composants.csv"), csv).expect("write dataset");
    let config_path = dir.join("Procureplan.toml");
    std::fs::write(&config_path, config).expect("write config");
    config_path
}
