use clap::{CommandFactory, Parser};
use openstack_lb_info::cli::Cli;
use std::process;

#[tokio::main]
async fn main() {
    // Bare invocation shows usage instead of a missing-argument error
    if std::env::args_os().len() <= 1 {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        println!();
        return;
    }

    let cli = Cli::parse();
    cli.init_logging();

    match openstack_lb_info::run(cli).await {
        Ok(report) if report.failed.is_empty() => {}
        Ok(report) => {
            eprintln!(
                "Error: {} of {} load balancer tree(s) could not be built: {}",
                report.failed.len(),
                report.failed.len() + report.rendered,
                report.failed.join(", ")
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
