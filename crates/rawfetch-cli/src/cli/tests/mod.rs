//! CLI parse tests.

use super::{Cli, NamingArg};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}


#[test]
fn naming_arg_maps_to_scheme() {
    use rawfetch_core::url_model::NamingScheme;
    assert_eq!(NamingScheme::from(NamingArg::Verbatim), NamingScheme::Verbatim);
    assert_eq!(NamingScheme::from(NamingArg::Hashed), NamingScheme::Hashed);
}
