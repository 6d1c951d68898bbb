use tokio::sync::{mpsc, watch};
use tokio::time::Duration;

use crate::config;
use crate::db::connection;
use crate::error::TaskpilotError;
use crate::output;
use crate::scheduler;

pub async fn run(interval_secs: Option<u64>, json_output: bool) -> i32 {
    match run_inner(interval_secs, json_output).await {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::error(&e)).unwrap()
                );
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

async fn run_inner(interval_secs: Option<u64>, json_output: bool) -> Result<i32, TaskpilotError> {
    let conn = connection::open_db()?;
    let config = config::load()?;
    let period = Duration::from_secs(interval_secs.unwrap_or(config.poll_interval_secs));

    let (events_tx, mut events_rx) = mpsc::channel(16);
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = stop_tx.send(true);
    });

    if !json_output {
        println!(
            "Watching for reminders every {}s (ctrl-c to stop)",
            period.as_secs()
        );
    }

    let printer = async {
        while let Some(event) = events_rx.recv().await {
            if json_output {
                println!("{}", output::json::reminder_event(&event));
            } else {
                output::text::print_reminder(&event);
            }
        }
    };

    // The polling loop drops the sender on shutdown, which ends the printer.
    let (loop_result, ()) = tokio::join!(scheduler::run(&conn, events_tx, period, stop_rx), printer);
    loop_result?;

    if !json_output {
        println!("Stopped.");
    }
    Ok(0)
}
