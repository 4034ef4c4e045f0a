use clap::Parser;
use log::*;
use std::{collections::HashMap, sync::Arc};
use anyhow::Result;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use api_logviewer::logrecords::AllLogRecords;
use api_logviewer::utility;
use api_logviewer::viewer::{render, HttpLogSource, LogViewer};

/// api_logviewer: show the API event logs of a log collection service.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Opts {
    /// full url of the log collection, overrides host and port
    #[arg(long, value_name = "url")]
    url: Option<String>,
    /// host of the log service
    #[arg(short = 'H', long, value_name = "hostname")]
    host: Option<String>,
    /// port of the log service
    #[arg(short, long, value_name = "port")]
    port: Option<String>,
    /// request timeout in seconds
    #[arg(long, value_name = "seconds")]
    timeout: Option<String>,
    /// show the logs once and exit
    #[arg(long)]
    once: bool,
    /// print the logs as json and exit
    #[arg(long)]
    json: bool,
    /// accept invalid certificates of an https endpoint
    #[arg(long)]
    accept_invalid_certs: bool,
    /// write the set url, host, port and timeout to .env
    #[arg(long)]
    write_dotenv: bool,
}

#[tokio::main]
async fn main() -> Result<()>
{
    env_logger::init();
    dotenv::dotenv().ok();
    let options = Opts::parse();

    let mut changed_options = HashMap::new();
    let url = utility::set_url(&options.url, &options.host, &options.port, &mut changed_options);
    let timeout = utility::set_timeout(&options.timeout, &mut changed_options)?;
    utility::dotenv_writer(options.write_dotenv, changed_options)?;

    let client = utility::build_client(timeout, options.accept_invalid_certs)?;
    info!("log collection url: {}", url);

    if options.json {
        let alllogrecords = AllLogRecords::read_logrecords(&client, &url).await?;
        alllogrecords.print_json()?;
        return Ok(());
    }

    let viewer = LogViewer::new(Arc::new(HttpLogSource::new(client, url)));
    let mut state_receiver = viewer.subscribe();

    if options.once {
        viewer.initialize().await;
        viewer.print();
        return Ok(());
    }

    let initializer = viewer.clone();
    tokio::spawn(async move { initializer.initialize().await });

    // The page is printed for every state change. Enter starts a refresh without waiting for running ones,
    // q or end of input quits.
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        tokio::select! {
            changed = state_receiver.changed() => {
                if changed.is_err() {
                    break;
                }
                let page = render(&state_receiver.borrow_and_update());
                println!("{}", page);
            },
            line = lines.next_line() => {
                match line? {
                    Some(input) if input.trim() == "q" => break,
                    Some(_) => {
                        let refresher = viewer.clone();
                        tokio::spawn(async move { refresher.refresh().await });
                    },
                    None => break,
                }
            },
        }
    }
    Ok(())
}
