use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI argument parsing with environment variable support.
///
/// Options are only recognised before the first input. Everything from the
/// first input on is handed to the input scanner untouched, which is where
/// `-z CMD` is interpreted.
#[derive(Parser, Debug)]
#[command(name = "packfs")]
#[command(about = "Pack files into a single C source file with a lookup API")]
#[command(version)]
#[command(
    after_help = "Example:\n  packfs -o fs.c index.html -z 'gzip -c' app.js style.css\n\n\
                  `-z CMD` pipes every following input through CMD (the path is appended \
                  as the last argument); `-z \"\"` turns filtering off again."
)]
pub struct Args {
    /// Write the generated source here instead of standard output
    #[arg(short, long, env = "PACKFS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, default_value = "packfs.toml", env = "PACKFS_CONFIG")]
    pub config: PathBuf,

    /// Prefix for the accessor names (e.g. `mg_` gives `mg_unpack`)
    #[arg(long, env = "PACKFS_PREFIX")]
    pub prefix: Option<String>,

    /// Bytes per row in the generated tables
    #[arg(long, env = "PACKFS_COLUMNS")]
    pub columns: Option<usize>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Files to pack, optionally interleaved with `-z CMD` filter directives
    #[arg(
        value_name = "INPUT",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(OsString)
    )]
    pub inputs: Vec<OsString>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn tokens(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_filter_directive_is_left_for_the_scanner() {
        let args = Args::try_parse_from(["packfs", "-z", "gzip -c", "a.txt"]).unwrap();
        assert_eq!(args.inputs, tokens(&["-z", "gzip -c", "a.txt"]));
    }

    #[test]
    fn test_options_before_inputs() {
        let args = Args::try_parse_from([
            "packfs", "-o", "fs.c", "--prefix", "mg_", "-vv", "a.txt", "-z", "cat", "b.txt",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("fs.c")));
        assert_eq!(args.prefix.as_deref(), Some("mg_"));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.inputs, tokens(&["a.txt", "-z", "cat", "b.txt"]));
    }

    #[test]
    fn test_flags_after_first_input_are_inputs() {
        let args = Args::try_parse_from(["packfs", "a.txt", "-v"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert_eq!(args.inputs, tokens(&["a.txt", "-v"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_input_is_accepted() {
        use std::os::unix::ffi::OsStrExt;

        let name = std::ffi::OsStr::from_bytes(b"caf\xe9.txt");
        let args = Args::try_parse_from([
            OsString::from("packfs"),
            OsString::from("-v"),
            name.to_os_string(),
        ])
        .unwrap();
        assert_eq!(args.inputs, vec![name.to_os_string()]);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Args::try_parse_from(["packfs"]).is_err());
    }
}
