use clap::Parser;

/// AMRT radar state server
#[derive(Debug, Parser)]
#[command(name = "amrt-server", version, about = "AMRT radar state server")]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "AMRT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "AMRT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Host and port in the form `TcpListener::bind` resolves, so IPv6
    /// literals and hostnames work as well as IPv4 addresses.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
