use clap::Parser;
use rostrum_domain::ListScreen;

/// Prints one page of an admin list screen as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "rostrum-console", version)]
pub struct ConsoleArgs {
    /// List screen to open: users, roles, permissions or notifications.
    #[arg(value_parser = parse_screen)]
    pub screen: ListScreen,

    /// Free-text search term.
    #[arg(long)]
    pub search: Option<String>,

    /// Structured filter; repeat for several fields.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter_pair)]
    pub filters: Vec<(String, String)>,

    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Rows per page; overrides CONSOLE_PAGE_SIZE.
    #[arg(long)]
    pub size: Option<u32>,
}

fn parse_screen(value: &str) -> Result<ListScreen, String> {
    value.parse::<ListScreen>().map_err(|error| error.to_string())
}

fn parse_filter_pair(value: &str) -> Result<(String, String), String> {
    let (key, raw) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{value}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter key must not be empty in '{value}'"));
    }

    Ok((key.to_owned(), raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rostrum_domain::ListScreen;

    use super::ConsoleArgs;

    fn parse(args: &[&str]) -> Result<ConsoleArgs, clap::Error> {
        let argv = std::iter::once("rostrum-console").chain(args.iter().copied());
        ConsoleArgs::try_parse_from(argv)
    }

    #[test]
    fn full_command_line_is_parsed() {
        let args = parse(&[
            "users",
            "--search",
            "ada",
            "--filter",
            "role=ADMIN",
            "--filter",
            "createdDate=2025-01-01..2025-01-31",
            "--page",
            "2",
            "--size",
            "25",
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(args.screen, ListScreen::Users);
        assert_eq!(args.search.as_deref(), Some("ada"));
        assert_eq!(args.filters.len(), 2);
        assert_eq!(args.filters[0], ("role".to_owned(), "ADMIN".to_owned()));
        assert_eq!(args.filters[1].1, "2025-01-01..2025-01-31");
        assert_eq!(args.page, 2);
        assert_eq!(args.size, Some(25));
    }

    #[test]
    fn screen_alone_uses_defaults() {
        let args = parse(&["notifications"]).unwrap_or_else(|_| unreachable!());

        assert_eq!(args.page, 0);
        assert!(args.filters.is_empty());
        assert!(args.size.is_none());
    }

    #[test]
    fn filter_values_may_contain_equals_signs() {
        let args = parse(&["roles", "--filter", "description=a=b"])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            args.filters,
            vec![("description".to_owned(), "a=b".to_owned())]
        );
    }

    #[test]
    fn malformed_command_lines_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["tenants"]).is_err());
        assert!(parse(&["roles", "--filter", "name"]).is_err());
        assert!(parse(&["roles", "--filter", "=x"]).is_err());
        assert!(parse(&["roles", "--page"]).is_err());
        assert!(parse(&["roles", "--page", "-1"]).is_err());
        assert!(parse(&["roles", "--verbose"]).is_err());
    }
}
