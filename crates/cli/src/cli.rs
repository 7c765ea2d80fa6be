use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[clap(
    name = "storyconv",
    version,
    about = "Find a story in the catalogue and convert its page into an EPUB"
)]
pub struct Cli {
    /// Search text; add "автор <name>" to narrow by author
    #[clap(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Directory that receives one folder per converted story
    #[clap(long)]
    pub storage: Option<PathBuf>,

    /// Seconds to wait for a conversion before giving up
    #[clap(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// The search words joined back into one string.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_query_words_are_joined() {
        let cli = Cli::parse_from(["storyconv", "Стрекоза", "и", "муравей", "автор", "Крылов"]);
        assert_eq!(cli.query_text(), "Стрекоза и муравей автор Крылов");
        assert_eq!(cli.storage, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "storyconv",
            "--storage",
            "/tmp/books",
            "--timeout",
            "30",
            "Колобок",
        ]);
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/books")));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.query_text(), "Колобок");
    }

    #[test]
    fn test_query_is_required() {
        assert!(Cli::try_parse_from(["storyconv"]).is_err());
    }
}
