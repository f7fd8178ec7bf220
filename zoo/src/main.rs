// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the zoo records service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::error;
use std::net::{IpAddr, Ipv4Addr};
use std::process::ExitCode;
use std::sync::Arc;
use zoo::serve;
use zoo_core::db::postgres::{PostgresDb, PostgresOptions};
use zoo_core::env::get_optional_var;

/// Default port to listen on.
const DEFAULT_PORT: u16 = 3000;

/// Configuration of the HTTP listener.
#[derive(Debug)]
struct ServerOptions {
    /// Address to bind to.
    addr: IpAddr,

    /// Port to listen on.
    port: u16,
}

impl ServerOptions {
    /// Reads the listener configuration from `<prefix>_BIND_ADDR` and `<prefix>_PORT`.
    fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            addr: get_optional_var::<IpAddr>(prefix, "BIND_ADDR")?
                .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
        })
    }
}

/// Gathers the configuration and starts the service.
async fn start() -> Result<(), String> {
    let server_opts = ServerOptions::from_env("ZOO")?;
    let db_opts = PostgresOptions::from_env("ZOO_PGSQL")?;
    let db = PostgresDb::connect(db_opts).map_err(|e| e.to_string())?;
    serve((server_opts.addr, server_opts.port), Arc::new(db)).await.map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
