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
use directories::ProjectDirs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crossbot", about = "Crossword puzzles for chat")]
pub struct Args {
    /// Where solver records are kept
    #[arg(long, value_name = "DIR", env = "CROSSBOT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Where rendered images are written. Defaults to DATA_DIR/temp
    #[arg(long, value_name = "DIR", env = "CROSSBOT_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,
    /// Puzzle catalog to use instead of the built-in puzzles
    #[arg(short, long, value_name = "FILE", env = "CROSSBOT_CATALOG")]
    pub catalog: Option<PathBuf>,
    /// Font to try before the system fonts
    #[arg(short, long, value_name = "FILE", env = "CROSSBOT_FONT")]
    pub font: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "CROSSBOT_ADMIN_PASSWORD",
        hide_env_values = true,
    )]
    pub admin_password: Option<String>,
    /// Solver to run a single command as
    #[arg(short, long, value_name = "ID", default_value = "local")]
    pub solver: String,
    /// A single command to run. Without one, lines of the form
    /// “<solver> <command>” are read from stdin
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("couldn’t find a home directory to store data in, use --data-dir")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub catalog: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub admin_password: Option<String>,
}

fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "crossbot")
        .map(|dirs| dirs.data_dir().to_owned())
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Config, Error> {
        let data_dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir().ok_or(Error::NoDataDir)?,
        };

        let scratch_dir = args.scratch_dir.clone()
            .unwrap_or_else(|| data_dir.join("temp"));

        Ok(Config {
            data_dir,
            scratch_dir,
            catalog: args.catalog.clone(),
            font: args.font.clone(),
            // An empty password would let anyone in
            admin_password: args.admin_password.clone()
                .filter(|password| !password.is_empty()),
        })
    }

    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(
            std::iter::once("crossbot").chain(args.iter().copied())
        ).unwrap()
    }

    #[test]
    fn explicit_dirs() {
        let args = parse(&[
            "--data-dir", "/srv/crossbot",
            "--admin-password", "hunter2",
            "-c", "puzzles.json",
        ]);
        let config = Config::from_args(&args).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/crossbot"));
        assert_eq!(config.scratch_dir, PathBuf::from("/srv/crossbot/temp"));
        assert_eq!(config.records_dir(), PathBuf::from("/srv/crossbot/records"));
        assert_eq!(config.catalog, Some(PathBuf::from("puzzles.json")));
        assert_eq!(config.admin_password.as_deref(), Some("hunter2"));
        assert!(config.font.is_none());
    }

    #[test]
    fn scratch_dir() {
        let args = parse(&["--data-dir", "/a", "--scratch-dir", "/tmp/b"]);
        let config = Config::from_args(&args).unwrap();

        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn empty_password() {
        let args = parse(&["--data-dir", "/a", "--admin-password", ""]);

        assert!(Config::from_args(&args).unwrap().admin_password.is_none());
    }

    #[test]
    fn single_command() {
        let args = parse(&["--data-dir", "/a", "-s", "42", "/x", "第一题"]);

        assert_eq!(args.solver, "42");
        assert_eq!(args.command, &["/x", "第一题"]);

        let args = parse(&["--data-dir", "/a"]);
        assert_eq!(args.solver, "local");
        assert!(args.command.is_empty());
    }
}
