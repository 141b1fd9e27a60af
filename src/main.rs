//! Recon stress-test runner.
//!
//! Drives randomized collaborative sessions through the simulation cluster
//! and reports throughput and convergence.


use stress_test::{stress_collaborative_session, stress_convergence, stress_rebase_storm};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("quick") => run_quick(),
        Some("full") => run_full(),
        Some("convergence") => run_convergence(),
        Some("help" | "--help" | "-h") => print_usage(),
        Some(other) => {
            println!("Unknown test suite: {other}");
            print_usage();
        }
    }
}

fn run_quick() {
    println!("Running quick stress tests...");
    stress_collaborative_session(3, 50, 7).print();
    stress_rebase_storm(32, 64, 7).print();
}

fn run_full() {
    println!("Running full stress suite...");
    for clients in [2, 4, 8] {
        stress_collaborative_session(clients, 500, 7).print();
    }
    stress_rebase_storm(256, 512, 7).print();
    stress_rebase_storm(1024, 128, 7).print();
    run_convergence();
}

fn run_convergence() {
    println!("Running convergence workloads...");
    stress_convergence(3, 2_000, 7).print();
    stress_convergence(5, 10_000, 7).print();
}

fn print_usage() {
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║                RECON STRESS TEST SUITE                     ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("Usage: cargo run [test_suite]");
    println!();
    println!("Available test suites:");
    println!("  quick       - Quick smoke tests (default)");
    println!("  full        - Larger sessions, rebase storms, convergence");
    println!("  convergence - Randomized schedules with per-event checks");
    println!("  help        - Show this message");
}
