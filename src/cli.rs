use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[clap(name = "parcelc", author, version, about)]
pub struct Arguments {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the C and host bindings
    Build {
        #[clap(flatten)]
        overrides: Overrides,
    },
    /// Parse and link the declarations without writing anything
    Check {
        #[clap(flatten)]
        overrides: Overrides,
    },
    /// Remove the files written by the last build
    Clean {
        #[clap(flatten)]
        overrides: Overrides,
    },
}

/// Command line values which take precedence over the config file
#[derive(clap::Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Path to the config file (default: parcelc.json5)
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Directory containing .cfd files (repeatable)
    #[clap(long = "source")]
    pub sources: Vec<PathBuf>,
    /// Directory of .cfd files of parcels built elsewhere (repeatable)
    #[clap(long = "include")]
    pub includes: Vec<PathBuf>,
    /// Parcel which must be found in the sources or includes (repeatable)
    #[clap(long = "prereq")]
    pub prereqs: Vec<String>,
    /// Output directory
    #[clap(long)]
    pub dest: Option<PathBuf>,
    /// Parcel to publish to the host (repeatable)
    #[clap(long = "host-parcel")]
    pub host_parcels: Vec<String>,
    /// Name of the host module
    #[clap(long = "host-module")]
    pub host_module: Option<String>,
}

pub fn parse_command_line_args() -> Arguments {
    Arguments::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_flags() {
        let args = Arguments::try_parse_from([
            "parcelc",
            "build",
            "--source",
            "core",
            "--source",
            "more",
            "--dest",
            "autogen",
            "--host-parcel",
            "Hello",
            "--include",
            "/usr/share/parcels",
            "--prereq",
            "Zoo",
        ])
        .unwrap();
        let Command::Build { overrides } = args.command else {
            panic!("expected build");
        };
        assert_eq!(overrides.sources, vec![PathBuf::from("core"), PathBuf::from("more")]);
        assert_eq!(overrides.dest, Some(PathBuf::from("autogen")));
        assert_eq!(overrides.host_parcels, vec!["Hello".to_string()]);
        assert_eq!(overrides.host_module, None);
        assert_eq!(overrides.includes, vec![PathBuf::from("/usr/share/parcels")]);
        assert_eq!(overrides.prereqs, vec!["Zoo".to_string()]);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Arguments::try_parse_from(["parcelc"]).is_err());
    }
}
