use clap::Parser;
use log::error;

use vacuum_link::config::{Config, SinkKind};
use vacuum_link::sink::{DatagramSink, FileSink, UdpSink};
use vacuum_link::supervisor;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let config = Config::parse();
    if let Err(err) = config.validate() {
        error!(target: "main", "invalid configuration: {err}");
        std::process::exit(1);
    }

    let sink: Box<dyn DatagramSink> = match config.sink {
        SinkKind::Udp => match UdpSink::connect(&config.collector).await {
            Ok(sink) => Box::new(sink),
            Err(err) => {
                error!(target: "main", "failed to open UDP sink for {}: {err}", config.collector);
                std::process::exit(1);
            }
        },
        SinkKind::File => Box::new(FileSink::new(config.fallback_path.clone())),
    };

    supervisor::run(config, sink).await;
}
