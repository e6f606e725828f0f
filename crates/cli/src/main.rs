use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use guia_core::constants::DEFAULT_OUTPUT_DIR;
use guia_core::validation::parse_identifier_list;
use guia_core::{
    resolve_source_file, unmapped_policy_from_env_value, CoreConfig, GuideForm, GuideService,
    RecordStore,
};

#[derive(Parser)]
#[command(name = "guia")]
#[command(about = "Internal movement guide generator CLI")]
struct Cli {
    /// CSV export of the asset spreadsheet
    #[arg(long, global = true, env = "GUIA_SOURCE_FILE")]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List origin and destination sections
    Sections,
    /// Print the asset records matching comma-separated identifiers as JSON
    Lookup {
        /// Asset identifiers, e.g. "101,202"
        bmp_numbers: String,
    },
    /// Look up the authority of a section
    Authority {
        /// Section name
        section: String,
        /// origin or destination
        #[arg(long, default_value = "origin")]
        role: String,
    },
    /// Generate a movement guide PDF
    Generate {
        /// Asset identifiers, e.g. "101,202"
        #[arg(long)]
        bmp_numbers: String,
        #[arg(long)]
        origin_section: String,
        #[arg(long)]
        destination_section: String,
        #[arg(long)]
        origin_authority: String,
        #[arg(long)]
        destination_authority: String,
        /// Directory the guide is written to
        #[arg(long, env = "GUIA_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        out_dir: PathBuf,
        /// Replace unsupported characters with '?' instead of failing
        #[arg(long)]
        replace_unmapped: bool,
    },
}

fn load_store(source: Option<PathBuf>) -> anyhow::Result<RecordStore> {
    let source = resolve_source_file(source)?;
    RecordStore::from_csv_path(&source).with_context(|| format!("loading {}", source.display()))
}

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Sections) => {
            let store = load_store(cli.source)?;
            println!("Origin sections:");
            for section in store.distinct_origin_sections() {
                println!("  {}", section);
            }
            println!("Destination sections:");
            for section in store.distinct_destination_sections() {
                println!("  {}", section);
            }
        }
        Some(Commands::Lookup { bmp_numbers }) => {
            let store = load_store(cli.source)?;
            let ids = parse_identifier_list(&bmp_numbers);
            let records = store.lookup_by_identifiers(&ids);
            if records.is_empty() {
                println!("No BMP found.");
            } else {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Some(Commands::Authority { section, role }) => {
            let store = load_store(cli.source)?;
            let cfg = CoreConfig::new(PathBuf::from(DEFAULT_OUTPUT_DIR), Default::default())?;
            let service = GuideService::new(Arc::new(cfg), Arc::new(store));
            let authority = service
                .authority(&section, &role)
                .context("looking up authority")?;
            if authority.is_empty() {
                println!("No authority recorded.");
            } else {
                println!("{}", authority);
            }
        }
        Some(Commands::Generate {
            bmp_numbers,
            origin_section,
            destination_section,
            origin_authority,
            destination_authority,
            out_dir,
            replace_unmapped,
        }) => {
            let store = load_store(cli.source)?;
            let policy = unmapped_policy_from_env_value(
                replace_unmapped.then(|| "replace".to_string()),
            )?;
            let cfg = CoreConfig::new(out_dir, policy)?;
            let service = GuideService::new(Arc::new(cfg), Arc::new(store));
            let form = GuideForm {
                bmp_numbers: Some(bmp_numbers),
                origin_section: Some(origin_section),
                destination_section: Some(destination_section),
                origin_authority: Some(origin_authority),
                destination_authority: Some(destination_authority),
            };
            let guide = service.generate(&form).context("generating guide")?;
            println!(
                "Wrote guide with {} rows ({} pages) to {}",
                guide.row_count,
                guide.page_count,
                guide.path.display()
            );
        }
        None => {
            println!("Use 'guia --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SOURCE: &str = "\
Nº BMP,NOMECLATURA/COMPONENTE,Nº SERIE,VL. ATUALIZ.,Seção de Origem,Seção de Destino,Chefia de Origem,Chefia de Destino
101,Cadeira,SN-1,10,A,B,Capt. X,Maj. Y
";

    fn args(tmp: &TempDir, rest: &[&str]) -> Cli {
        let source = tmp.path().join("patrimonio.csv");
        std::fs::write(&source, SOURCE).unwrap();
        let out_dir = tmp.path().join("out");
        let mut argv = vec![
            "guia".to_string(),
            "--source".to_string(),
            source.display().to_string(),
        ];
        argv.extend(rest.iter().map(|s| s.to_string()));
        if rest.first() == Some(&"generate") {
            argv.push("--out-dir".into());
            argv.push(out_dir.display().to_string());
        }
        Cli::try_parse_from(argv).unwrap()
    }

    fn generate(tmp: &TempDir, ids: &str) -> Cli {
        args(
            tmp,
            &[
                "generate",
                "--bmp-numbers",
                ids,
                "--origin-section",
                "A",
                "--destination-section",
                "B",
                "--origin-authority",
                "Capt. X",
                "--destination-authority",
                "Maj. Y",
            ],
        )
    }

    #[test]
    fn test_generate_writes_guide() {
        let tmp = TempDir::new().unwrap();
        run(generate(&tmp, "101")).unwrap();
        assert_eq!(std::fs::read_dir(tmp.path().join("out")).unwrap().count(), 1);
    }

    #[test]
    fn test_generate_unknown_id_fails() {
        let tmp = TempDir::new().unwrap();
        let err = run(generate(&tmp, "999")).unwrap_err();
        assert!(err.to_string().contains("generating guide"));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_authority_invalid_role_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(run(args(&tmp, &["authority", "A", "--role", "owner"])).is_err());
        assert!(run(args(&tmp, &["authority", "A", "--role", "origin"])).is_ok());
    }
}
