use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the typesynth binary.
#[derive(Parser, Debug)]
#[command(
    name = "typesynth",
    version,
    about = "Synthesize settings and event declarations from component library metadata"
)]
pub struct CliArgs {
    /// Metadata document of the library to synthesize declarations for.
    #[arg(short = 'l', long)]
    pub library: PathBuf,

    /// Metadata document of a dependency library. May be repeated.
    #[arg(short = 'd', long = "dependency")]
    pub dependencies: Vec<PathBuf>,

    /// Directory searched recursively for dependency metadata (*.json).
    #[arg(long = "deps-dir")]
    pub deps_dir: Option<PathBuf>,

    /// TOML file overriding the default naming conventions.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write the declarations here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Also write the augmented library metadata as JSON.
    #[arg(long = "dump-json")]
    pub dump_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_dependencies() {
        let args = CliArgs::try_parse_from([
            "typesynth",
            "--library",
            "sap.m.json",
            "-d",
            "core.json",
            "--dependency",
            "unified.json",
            "--out",
            "sap.m.d.ts",
        ])
        .unwrap();

        assert_eq!(args.library, PathBuf::from("sap.m.json"));
        assert_eq!(
            args.dependencies,
            vec![PathBuf::from("core.json"), PathBuf::from("unified.json")]
        );
        assert_eq!(args.out, Some(PathBuf::from("sap.m.d.ts")));
        assert!(args.deps_dir.is_none());
    }

    #[test]
    fn test_library_is_required() {
        assert!(CliArgs::try_parse_from(["typesynth", "--out", "x.d.ts"]).is_err());
    }
}
