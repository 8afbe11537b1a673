use clap::Parser;
use git_helper_utils::cli::{run_create_commit_file, CommitFileArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CommitFileArgs::parse();

    if let Err(e) = run_create_commit_file(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
