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
use crossbot::catalog::Catalog;
use crossbot::direction::{self, Direction};
use crossbot::fonts::FontSet;
use crossbot::grid::Grid;
use crossbot::numerals;
use crossbot::puzzle_data::{AnswerKind, PuzzleDefinition};
use crossbot::render::{self, Renderer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "check-puzzles")]
struct Cli {
    /// Catalog to check. Defaults to the built-in puzzles
    #[arg(value_name = "CATALOG")]
    catalog: Option<PathBuf>,
    #[arg(short = 'H', long)]
    human_readable: bool,
    /// Write an answer image for each grid puzzle into DIR
    #[arg(short, long, value_name = "DIR")]
    render: Option<PathBuf>,
    #[arg(short, long, value_name = "FILE")]
    font: Option<PathBuf>,
}

fn kind_name(kind: &AnswerKind) -> &'static str {
    match kind {
        AnswerKind::Standard => "standard",
        AnswerKind::LengthOnly => "length only",
        AnswerKind::CrossValidated => "cross validated",
        AnswerKind::FreeSequence { .. } => "free sequence",
    }
}

// Across clues are numbered with digits and down clues with Chinese
// numerals. Nothing breaks if a puzzle doesn’t follow that but the
// help text tells solvers to expect it.
fn check_labels(puzzle: &PuzzleDefinition) -> usize {
    let mut n_warnings = 0;

    for placement in puzzle.placements.iter() {
        let cjk = numerals::is_cjk_label(&placement.label);

        let expected_cjk = match placement.direction {
            Direction::Across => false,
            Direction::Down => true,
        };

        if cjk != expected_cjk {
            log::warn!(
                "puzzle {}: {} clue labelled “{}”",
                puzzle.id,
                placement.direction.name(),
                placement.label,
            );
            n_warnings += 1;
        }
    }

    n_warnings
}

fn print_grid(grid: &Grid) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = grid.at((row, col));

            if !cell.fillable {
                print!("  ");
            } else if cell.content.is_empty() {
                print!("□");
            } else {
                print!("{}", cell.content);
            }
        }

        println!();
    }
}

fn print_human_readable(puzzle: &PuzzleDefinition) {
    println!(
        "\nPuzzle {} ({}, {}×{})\n",
        puzzle.id,
        kind_name(&puzzle.kind),
        puzzle.rows,
        puzzle.cols,
    );

    if let Some(prompt) = &puzzle.prompt {
        println!("{}\n", prompt);
    }

    if let AnswerKind::FreeSequence { answer } = &puzzle.kind {
        println!("Answer: {}", answer);
        return;
    }

    match Grid::solution(puzzle) {
        Ok(grid) => print_grid(&grid),
        Err(e) => println!("{}", e),
    }

    for dir in [Direction::Across, Direction::Down] {
        println!("\n{}\n", dir.name());

        for placement in puzzle.placements.iter()
            .filter(|placement| placement.direction == dir)
        {
            println!(
                "{:>4} {:<4} {}",
                placement.label,
                direction::format_anchor(placement.anchor),
                placement.answers.join(" / "),
            );

            if let Some(clue) = &placement.clue {
                println!("          {}", clue);
            }
        }
    }
}

fn render_answers(
    catalog: &Catalog,
    dir: &Path,
    font: Option<&Path>,
) -> Result<(), render::Error> {
    let renderer = Renderer::new(FontSet::resolve(font, None));

    for puzzle in catalog.puzzles().filter(|puzzle| puzzle.kind.is_grid()) {
        let image = renderer.render_solution(puzzle)?;
        let path = render::image_path(dir, &format!("answer_{}", puzzle.id));

        render::save_png(&image, &path)?;

        println!("{}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    };

    let catalog = match catalog {
        Ok(c) => c,
        Err(e) => {
            match &cli.catalog {
                Some(path) => eprintln!("{}: {}", path.display(), e),
                None => eprintln!("built-in puzzles: {}", e),
            }
            return ExitCode::FAILURE;
        },
    };

    let mut n_warnings = 0;

    for puzzle in catalog.puzzles() {
        n_warnings += check_labels(puzzle);

        if cli.human_readable {
            print_human_readable(puzzle);
        } else {
            println!(
                "{}: {}, {}×{}, {} clues",
                puzzle.id,
                kind_name(&puzzle.kind),
                puzzle.rows,
                puzzle.cols,
                puzzle.placements.len(),
            );
        }
    }

    if let Some(dir) = &cli.render {
        if let Err(e) = render_answers(&catalog, dir, cli.font.as_deref()) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    if n_warnings > 0 {
        log::info!("{} label warnings", n_warnings);
    }

    ExitCode::SUCCESS
}
