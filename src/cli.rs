// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON Lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallyclip")
        .version(crate_version!())
        .about("Tallyclip: income/expense tracking, category budgets, and a spending dashboard")
        .arg(
            Arg::new("file")
                .long("file")
                .global(true)
                .value_name("PATH")
                .help("Ledger file to use instead of the platform default"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("NAME")
                .default_value("local")
                .help("Owner whose records are read and written"),
        )
        .subcommand(Command::new("init").about("Create the ledger file"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an income or expense")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .value_name("DECIMAL"),
                        )
                        .arg(
                            Arg::new("title")
                                .long("title")
                                .required(true)
                                .value_name("TEXT"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_name("NAME"),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense"])
                                .default_value("expense"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(Arg::new("category").long("category").value_name("NAME"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_name("N")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true).value_name("ID")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("icon")
                                .long("icon")
                                .value_name("NAME")
                                .default_value("tag"),
                        )
                        .arg(Arg::new("color").long("color").value_name("HEX")),
                )
                .subcommand(json_flags(Command::new("list").about("List categories")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Set and inspect category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create or update a category budget")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_name("NAME"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .required(true)
                                .value_name("DECIMAL"),
                        )
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .value_name("ID")
                                .help("Edit this budget instead of matching by category"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List budgets")))
                .subcommand(json_flags(
                    Command::new("status").about("Spending against each budget"),
                )),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Totals, category breakdown, and the daily spending trend")
                .arg(
                    Arg::new("on")
                        .long("on")
                        .value_name("YYYY-MM-DD")
                        .help("Reference date, defaults to today"),
                )
                .arg(
                    Arg::new("window")
                        .long("window")
                        .value_name("DAYS")
                        .default_value("7")
                        .value_parser(value_parser!(u32).range(1..)),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Export ledger data to files")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .value_name("FMT"),
                        )
                        .arg(Arg::new("out").long("out").required(true).value_name("PATH")),
                )
                .subcommand(
                    Command::new("dashboard")
                        .about("Export the aggregated dashboard")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .value_name("FMT"),
                        )
                        .arg(Arg::new("out").long("out").required(true).value_name("PATH"))
                        .arg(Arg::new("on").long("on").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("window")
                                .long("window")
                                .value_name("DAYS")
                                .default_value("7")
                                .value_parser(value_parser!(u32).range(1..)),
                        ),
                ),
        )
}
