use clap::Parser;
use hls_resolver::ProxyType;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    author = "hua0512 <https://github.com/hua0512>",
    version,
    about = "Resolve HLS playlists into absolute segment lists",
    long_about = "Fetches an HLS playlist, lets you pick a variant when it is a master\n\
                  playlist, and prints every media segment with an absolute URI and,\n\
                  for encrypted streams, an absolute key URI.\n\
                  \n\
                  The output is meant to be fed to a downloader; nothing is downloaded here."
)]
pub struct CliArgs {
    /// Playlist URL
    #[arg(required = true, help = "URL of the master or media playlist")]
    pub url: String,

    /// Custom HTTP headers for playlist requests
    #[arg(
        long = "header",
        short = 'H',
        help = "Add custom HTTP header to requests (can be used multiple times). Format: 'Name: Value'",
        value_name = "HEADER"
    )]
    pub headers: Vec<String>,

    /// Variant selection
    #[arg(
        short,
        long,
        default_value = "interactive",
        help = "Variant selection for master playlists: interactive, highest, lowest, best-resolution, an option number (1-based) or WIDTHxHEIGHT"
    )]
    pub select: String,

    /// Fixed base URL for variant references
    #[arg(
        long,
        help = "Base URL that variant references are appended to, replacing the directory of the master playlist URL"
    )]
    pub base_url: Option<String>,

    /// Maximum playlist nesting
    #[arg(
        long,
        default_value = "2",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Maximum number of playlists fetched for one resolution"
    )]
    pub max_depth: u64,

    /// Overall timeout in seconds
    #[arg(
        long,
        default_value = "30",
        help = "Overall timeout in seconds for each playlist request (0 disables it)"
    )]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value = "10",
        help = "Connection timeout in seconds (time to establish initial connection)"
    )]
    pub connect_timeout: u64,

    #[arg(long, help = "User agent sent with playlist requests")]
    pub user_agent: Option<String>,

    /// Proxy URL (e.g., "http://proxy.example.com:8080")
    #[arg(
        long,
        help = "Proxy server URL (e.g., \"http://proxy.example.com:8080\")"
    )]
    pub proxy: Option<String>,

    #[arg(long, value_enum, default_value = "all", help = "Requests the proxy applies to")]
    pub proxy_type: ProxyType,

    #[arg(long, help = "Username for proxy authentication")]
    pub proxy_user: Option<String>,

    #[arg(long, help = "Password for proxy authentication")]
    pub proxy_pass: Option<String>,

    /// Disable all proxy settings
    #[arg(
        long,
        help = "Disable all proxy settings (including system proxy)"
    )]
    pub no_proxy: bool,

    #[arg(long, help = "Print the resolved segments as JSON")]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable detailed debug logging")]
    pub verbose: bool,
}
