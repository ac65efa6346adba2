use nearby_core::PageConfig;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["nearby-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_device_position() {
    let cli = Cli::try_parse_from([
        "nearby-cli",
        "search",
        "--lat",
        "-23.55",
        "--lng",
        "-46.63",
        "--radius",
        "5",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Search(args)) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.lat, Some(-23.55));
    assert_eq!(args.lng, Some(-46.63));
    assert_eq!(args.radius.as_deref(), Some("5"));
    assert!(!args.locate);
}

#[test]
fn search_lat_requires_lng() {
    let result = Cli::try_parse_from(["nearby-cli", "search", "--lat", "1.0"]);
    assert!(result.is_err());
}

#[test]
fn parses_search_with_postal_code() {
    let cli = Cli::try_parse_from(["nearby-cli", "search", "--postal-code", "01001-000"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Search(SearchArgs {
            postal_code: Some(ref code),
            ..
        })) if code == "01001-000"
    ));
}

#[test]
fn assemble_prints_canonical_url() {
    let cli = Cli::try_parse_from([
        "nearby-cli",
        "assemble",
        "--lat",
        "-23.5505",
        "--lng",
        "-46.6333",
        "--radius",
        "80",
        "--category",
        "food",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Assemble(args)) = cli.command else {
        panic!("expected assemble command");
    };

    let url = assemble::run_assemble(&PageConfig::default(), &args);
    assert_eq!(
        url,
        "/search/results?lat=-23.550500&lng=-46.633300&limit=15&offset=0&category=food&radius_km=50"
    );
}

#[test]
fn assemble_keeps_requested_offset() {
    let cli = Cli::try_parse_from([
        "nearby-cli", "assemble", "--lat", "1", "--lng", "2", "--offset", "30",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Assemble(args)) = cli.command else {
        panic!("expected assemble command");
    };
    let url = assemble::run_assemble(&PageConfig::default(), &args);
    assert!(url.contains("&offset=30&"));
}
