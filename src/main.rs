// Crossbot – A crossword puzzle game
// Copyright (C) 2026  The Crossbot authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use clap::Parser;
use crossbot::bot::{Bot, Reply};
use crossbot::config::{Args, Config};
use std::io::BufRead;
use std::process::ExitCode;

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);

    if let Some(image) = &reply.image {
        println!("[image: {}]", image.display());
    }
}

// Each line is a solver id followed by the chat text it sent
fn run_lines(bot: &Bot) -> Result<(), std::io::Error> {
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((solver, text)) = line.split_once(char::is_whitespace)
        else {
            eprintln!("expected “<solver> <command>”: {}", line);
            continue;
        };

        print_reply(&bot.handle_text(solver, text));
        println!();
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();

    let config = match Config::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let bot = match Bot::from_config(&config) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    if !args.command.is_empty() {
        print_reply(&bot.handle_text(&args.solver, &args.command.join(" ")));
        return ExitCode::SUCCESS;
    }

    if let Err(e) = run_lines(&bot) {
        eprintln!("stdin: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
