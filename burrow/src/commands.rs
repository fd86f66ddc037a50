use crate::CLAP_STYLING;
use burrow::DEFAULT_URL;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("burrow")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("burrow")
        .about("Discover every page a website links to on its own domain")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("the url that you want to crawl")
                .default_value(DEFAULT_URL),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("the maximum number of links deep to traverse")
                .value_parser(clap::value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("3"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-v --"verbose" "Print each link to stderr as it is discovered")
                .required(false),
        )
}
