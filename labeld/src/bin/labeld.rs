// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Executable program to run labeld, the label service of the Gantry
//! registry control plane

use anyhow::anyhow;
use camino::Utf8PathBuf;
use clap::Parser;
use gantry_common::cmd::fatal;
use gantry_common::cmd::CmdError;
use gantry_labeld::run_openapi_external;
use gantry_labeld::run_server;
use gantry_labeld::Config;

#[derive(Debug, Parser)]
#[clap(name = "labeld", about = "See README.adoc for more information")]
struct Args {
    #[clap(
        short = 'O',
        long = "openapi",
        help = "Print the external OpenAPI Spec document and exit",
        action
    )]
    openapi: bool,

    #[clap(
        name = "CONFIG_FILE_PATH",
        action,
        required_unless_present = "openapi"
    )]
    config_file_path: Option<Utf8PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(cmd_error) = do_run().await {
        fatal(cmd_error);
    }
}

async fn do_run() -> Result<(), CmdError> {
    let args = Args::parse();

    if args.openapi {
        run_openapi_external().map_err(|e| CmdError::Failure(anyhow!(e)))
    } else {
        // `.unwrap()` here is fine because our clap config requires
        // `config_file_path` to be passed if `openapi` is not.
        let config_file_path = args.config_file_path.as_ref().unwrap();
        let config = Config::from_file(config_file_path)
            .map_err(|e| CmdError::Failure(anyhow!(e)))?;

        run_server(&config).await.map_err(|e| CmdError::Failure(anyhow!(e)))
    }
}
