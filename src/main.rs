// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use tallyclip::identity::{IdentityProvider, LocalIdentity};
use tallyclip::{cli, commands, ledger, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = match matches.get_one::<String>("file") {
        Some(p) => PathBuf::from(p),
        None => ledger::ledger_path()?,
    };
    let user = matches
        .get_one::<String>("user")
        .map(String::as_str)
        .unwrap_or("local");
    let identity = LocalIdentity::signed_in(user);
    let owner = identity.current_user().context("No signed-in user")?;
    let store = ledger::load(&path)?.with_owner(&owner);

    match matches.subcommand() {
        Some(("init", _)) => {
            ledger::save(&path, &store)?;
            println!("Ledger initialized at {}", path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&store, &path, &owner, sub)?,
        Some(("category", sub)) => commands::categories::handle(&store, &path, &owner, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, &path, &owner, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, &owner, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &owner, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
