//! Bind and deploy a hosting target with the firebase wrapper
//!
//! To run this example:
//! ```sh
//! cd crates/firebase
//! cargo run --example deploy -- /path/to/project my-site
//! ```

use firebase::Firebase;

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let (Some(project), Some(target)) = (args.next(), args.next()) else {
        eprintln!("usage: deploy <project-dir> <target>");
        std::process::exit(2);
    };

    let cli = Firebase::default().with_workdir(&project);

    match cli.version().await {
        Ok(version) => println!("firebase {}", version),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\nMake sure 'firebase' is installed and in your PATH.");
            std::process::exit(1);
        }
    }

    let bound = cli.target_apply(&target, &target).await;
    println!("target:apply -> success={}", bound.success);

    let deployed = cli.deploy_hosting(&target).await;
    println!("deploy -> success={}", deployed.success);
    if !deployed.success {
        eprintln!("{}", deployed.combined());
    }
}
