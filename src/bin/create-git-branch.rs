use clap::Parser;
use git_helper_utils::cli::{run_create_branch, BranchArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = BranchArgs::parse();

    if let Err(e) = run_create_branch(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
