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

use super::catalog::{self, Catalog};
use super::command::{self, AdminAction, Command};
use super::config::Config;
use super::direction;
use super::fonts::FontSet;
use super::game_state::{CommitError, GameState};
use super::grid;
use super::puzzle_data::{AnswerKind, PuzzleDefinition};
use super::render::{self, Renderer};
use super::store::{self, JsonStore, SolverRecord, SolverStore};
use super::validator::{self, Rejection, Verdict};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

const TRY_AGAIN: &str = "发生错误，请稍后重试";
const NO_PUZZLE: &str = "请先使用 /选择题目 或者/x 第X题 选择要回答的题目";

const GRID_INSTRUCTIONS: &str = "\
请使用 /作答 或者/z 题号 答案 来提交答案
使用 /擦除 或者/d 题号 可以擦除已填写的答案
使用 /转换 或者/sw 在假名和罗马音之间切换
使用 /pass 或者/p 可以放弃当前题目
使用 /查询 或者/c 题号 可以查询题目内容";

const SEQUENCE_INSTRUCTIONS: &str = "\
请使用 /作答 1 答案 来提交答案
答案是用逗号分隔的数字（支持中文和英文逗号）
只能提交一次";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] catalog::Error),
    #[error(transparent)]
    Store(#[from] store::Error),
    #[error(transparent)]
    Render(#[from] render::Error),
    #[error(transparent)]
    Grid(#[from] grid::Error),
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// What is sent back to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub image: Option<PathBuf>,
}

impl Reply {
    fn text<S: Into<String>>(text: S) -> Reply {
        Reply { text: text.into(), image: None }
    }

    fn with_image<S: Into<String>>(text: S, image: PathBuf) -> Reply {
        Reply { text: text.into(), image: Some(image) }
    }
}

pub struct Bot {
    catalog: Catalog,
    store: Arc<dyn SolverStore>,
    renderer: Renderer,
    scratch_dir: PathBuf,
    admin_password: Option<String>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

fn conflict_message(error: &CommitError) -> Option<String> {
    let CommitError::CrossConflict { other, row, col, existing, .. } = error
    else {
        return None;
    };

    Some(format!(
        "答案与第{}题在{}处已填写的“{}”冲突，请检查后重试",
        other,
        direction::format_anchor((*row, *col)),
        existing,
    ))
}

impl Bot {
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn SolverStore>,
        renderer: Renderer,
        scratch_dir: PathBuf,
    ) -> Bot {
        Bot {
            catalog,
            store,
            renderer,
            scratch_dir,
            admin_password: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Bot, Error> {
        let catalog = match &config.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };

        let store = JsonStore::new(config.records_dir())?;
        log::info!("keeping solver records in {}", store.dir().display());

        let fonts = FontSet::resolve(
            config.font.as_deref(),
            Some(config.data_dir.as_path()),
        );

        let mut bot = Bot::new(
            catalog,
            Arc::new(store),
            Renderer::new(fonts),
            config.scratch_dir.clone(),
        );

        bot.set_admin_password(config.admin_password.clone());

        Ok(bot)
    }

    pub fn set_admin_password(&mut self, password: Option<String>) {
        self.admin_password = password;
    }

    fn solver_lock(&self, solver: &str) -> Arc<Mutex<()>> {
        self.locks.lock()
            .entry(solver.to_string())
            .or_default()
            .clone()
    }

    // Drops the map entry once nobody else is waiting on the lock so
    // that the map doesn’t grow with every solver ever seen.
    fn release_lock(&self, solver: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();

        let idle = locks.get(solver)
            .is_some_and(|l| Arc::ptr_eq(l, &lock))
            && Arc::strong_count(&lock) == 2;

        if idle {
            locks.remove(solver);
        }
    }

    /// Parses and runs a line of chat text.
    pub fn handle_text(&self, solver: &str, text: &str) -> Reply {
        match text.parse::<Command>() {
            Ok(command) => self.handle(solver, command),
            Err(e) => Reply::text(e.to_string()),
        }
    }

    /// Runs a command for a solver. Commands from the same solver are
    /// run one at a time. Internal failures are logged and the solver
    /// only gets a generic reply.
    pub fn handle(&self, solver: &str, command: Command) -> Reply {
        // Admin commands don’t save the sender’s record. Clearing takes
        // every solver’s lock itself.
        let lock = (!matches!(command, Command::Admin { .. }))
            .then(|| self.solver_lock(solver));
        let guard = lock.as_ref().map(|lock| lock.lock());

        log::debug!("{}: {:?}", solver, command);

        let reply = match self.run(solver, command) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("{}: {}", solver, e);
                Reply::text(TRY_AGAIN)
            },
        };

        drop(guard);

        if let Some(lock) = lock {
            self.release_lock(solver, lock);
        }

        reply
    }

    fn run(&self, solver: &str, command: Command) -> Result<Reply, Error> {
        let mut record = self.store.load(solver)?;
        let before = record.clone();

        let reply = match command {
            Command::Help => Reply::text(command::HELP_TEXT),
            Command::Select(id) => self.select(solver, &mut record, id)?,
            Command::Answer { label, text } => {
                self.answer(solver, &mut record, &label, &text)?
            },
            Command::ToggleDisplay => {
                self.toggle_display(solver, &mut record)?
            },
            Command::Pass => pass(solver, &mut record),
            Command::Submit => self.submit(solver, &mut record)?,
            Command::Query(label) => self.query(&record, &label)?,
            Command::Erase(label) => self.erase(solver, &mut record, &label)?,
            // Leaves the record alone so clearing isn’t undone by a save
            Command::Admin { password, action } => {
                self.admin(solver, &password, action)?
            },
        };

        if record != before {
            self.store.save(solver, &record)?;
        }

        Ok(reply)
    }

    fn state_image(
        &self,
        solver: &str,
        state: &GameState,
        puzzle: &PuzzleDefinition,
    ) -> Result<PathBuf, Error> {
        let image = self.renderer.render(state, puzzle);
        let path = render::image_path(
            &self.scratch_dir,
            &format!("game_{}", solver),
        );

        render::save_png(&image, &path)?;

        Ok(path)
    }

    fn solution_image(
        &self,
        puzzle: &PuzzleDefinition,
    ) -> Result<PathBuf, Error> {
        let image = self.renderer.render_solution(puzzle)?;
        let path = render::image_path(
            &self.scratch_dir,
            &format!("answer_{}", puzzle.id),
        );

        render::save_png(&image, &path)?;

        Ok(path)
    }

    // The puzzle the solver is working on along with its saved state.
    // A missing state is recreated.
    fn current<'a>(
        &'a self,
        record: &mut SolverRecord,
    ) -> Result<Option<&'a PuzzleDefinition>, Error> {
        let Some(id) = record.current_puzzle
        else {
            return Ok(None);
        };

        let puzzle = self.catalog.lookup(id)?;

        if record.game_state.is_none() {
            log::warn!("recreating missing state for puzzle {}", id);
            record.game_state = Some(GameState::new(puzzle)?);
        }

        Ok(Some(puzzle))
    }

    fn select(
        &self,
        solver: &str,
        record: &mut SolverRecord,
        id: u32,
    ) -> Result<Reply, Error> {
        if !self.catalog.contains(id) {
            return Ok(Reply::text(format!("题目 {} 不存在", id)));
        }

        let puzzle = self.catalog.lookup(id)?;

        if record.completed.contains(&id) {
            return Ok(Reply::text(format!(
                "你已经完成第{}题了，请选择其他题目",
                id,
            )));
        }

        let resuming = record.current_puzzle == Some(id);

        if record.attempted.contains(&id) {
            if !puzzle.kind.is_grid() {
                return Ok(Reply::text(format!(
                    "你已经尝试过第{}题了，不能重复尝试",
                    id,
                )));
            }

            if !resuming && record.last_puzzle != Some(id) {
                return Ok(Reply::text(format!(
                    "你已经尝试过第{}题了，只能重新选择刚刚放弃的题目",
                    id,
                )));
            }
        }

        // Switching away from a puzzle with progress gives it up
        if let Some(other) = record.current_puzzle.filter(|&other| other != id)
        {
            if record.attempted.contains(&other) {
                log::info!("{} abandoned puzzle {}", solver, other);
                record.last_puzzle = Some(other);
            }
        }

        if !resuming || record.game_state.is_none() {
            record.current_puzzle = Some(id);
            record.game_state = Some(GameState::new(puzzle)?);
            log::info!("{} selected puzzle {}", solver, id);
        }

        let Some(state) = record.game_state.as_ref()
        else {
            return Ok(Reply::text(TRY_AGAIN));
        };

        if !puzzle.kind.is_grid() {
            let mut text = format!("已选择第{}题\n", id);

            if let Some(prompt) = &puzzle.prompt {
                text.push_str(prompt);
                text.push_str("\n\n");
            }

            text.push_str(SEQUENCE_INSTRUCTIONS);

            return Ok(Reply::text(text));
        }

        let verb = if resuming { "继续" } else { "已选择" };

        Ok(Reply::with_image(
            format!("{}第{}题\n{}", verb, id, GRID_INSTRUCTIONS),
            self.state_image(solver, state, puzzle)?,
        ))
    }

    fn complete(
        &self,
        solver: &str,
        record: &mut SolverRecord,
        puzzle: &PuzzleDefinition,
        message: &str,
    ) -> Result<Reply, Error> {
        log::info!("{} completed puzzle {}", solver, puzzle.id);

        record.attempted.insert(puzzle.id);
        record.completed.insert(puzzle.id);
        record.clear_current();

        let text = format!(
            "{}\n恭喜你完成第{}题！\n请使用 /选择题目 第X题 选择新的题目",
            message,
            puzzle.id,
        );

        if puzzle.kind.is_grid() {
            Ok(Reply::with_image(text, self.solution_image(puzzle)?))
        } else {
            Ok(Reply::text(text))
        }
    }

    fn answer_sequence(
        &self,
        solver: &str,
        record: &mut SolverRecord,
        puzzle: &PuzzleDefinition,
        label: &str,
        text: &str,
    ) -> Result<Reply, Error> {
        let verdict = validator::validate(puzzle, label, text);

        match verdict {
            Verdict::Accepted { ref canonical, .. } => {
                if let Some(state) = record.game_state.as_mut() {
                    state.commit(puzzle, label, canonical)?;
                }

                self.complete(solver, record, puzzle, &verdict.message())
            },
            // Badly formed answers don’t use up the attempt
            Verdict::Rejected(Rejection::WrongAnswer) => {
                log::info!("{} failed puzzle {}", solver, puzzle.id);

                record.attempted.insert(puzzle.id);
                record.clear_current();

                Ok(Reply::text(format!(
                    "{}\n第{}题只能提交一次，请选择其他题目",
                    verdict.message(),
                    puzzle.id,
                )))
            },
            Verdict::Rejected(_) => Ok(Reply::text(verdict.message())),
        }
    }

    fn answer(
        &self,
        solver: &str,
        record: &mut SolverRecord,
        label: &str,
        text: &str,
    ) -> Result<Reply, Error> {
        let Some(puzzle) = self.current(record)?
        else {
            return Ok(Reply::text(NO_PUZZLE));
        };

        if !puzzle.kind.is_grid() {
            return self.answer_sequence(solver, record, puzzle, label, text);
        }

        let verdict = validator::validate(puzzle, label, text);

        let Verdict::Accepted { canonical, provisional } = &verdict
        else {
            return Ok(Reply::text(verdict.message()));
        };

        let Some(state) = record.game_state.as_mut()
        else {
            return Ok(Reply::text(TRY_AGAIN));
        };

        if let Err(e) = state.commit(puzzle, label, canonical) {
            return match conflict_message(&e) {
                Some(message) => Ok(Reply::text(message)),
                None => Err(e.into()),
            };
        }

        record.attempted.insert(puzzle.id);

        if state.is_complete(puzzle) {
            if !provisional {
                let message = verdict.message();
                return self.complete(solver, record, puzzle, &message);
            }

            let text = format!(
                "{}\n所有题目已填写完成，请使用 /提交 提交答案",
                verdict.message(),
            );

            return Ok(Reply::with_image(
                text,
                self.state_image(solver, state, puzzle)?,
            ));
        }

        Ok(Reply::with_image(
            verdict.message(),
            self.state_image(solver, state, puzzle)?,
        ))
    }

    fn toggle_display(
        &self,
        solver: &str,
        record: &mut SolverRecord,
    ) -> Result<Reply, Error> {
        let unsupported = "当前题目不支持假名转换功能";

        let puzzle = match self.current(record)? {
            Some(puzzle) if puzzle.kind.is_grid() => puzzle,
            Some(_) => return Ok(Reply::text(unsupported)),
            None => return Ok(Reply::text("请先选择题目")),
        };

        let Some(state) = record.game_state.as_mut()
        else {
            return Ok(Reply::text(TRY_AGAIN));
        };

        match state.toggle_display(puzzle) {
            Ok(mode) => Ok(Reply::with_image(
                format!("已切换到{}显示模式", mode.name()),
                self.state_image(solver, state, puzzle)?,
            )),
            Err(_) => Ok(Reply::text(unsupported)),
        }
    }

    fn submit(
        &self,
        solver: &str,
        record: &mut SolverRecord,
    ) -> Result<Reply, Error> {
        let Some(puzzle) = self.current(record)?
        else {
            return Ok(Reply::text("请先选择题目"));
        };

        if !puzzle.kind.is_grid() {
            return Ok(Reply::text(SEQUENCE_INSTRUCTIONS));
        }

        if !puzzle.kind.defers_checking() {
            return Ok(Reply::text("当前题目答对后会自动完成，不需要提交"));
        }

        let Some(state) = record.game_state.as_ref()
        else {
            return Ok(Reply::text(TRY_AGAIN));
        };

        if !state.is_complete(puzzle) {
            return Ok(Reply::text("还有题目未完成，请继续努力！"));
        }

        let wrong = state.check_solution(puzzle);

        if !wrong.is_empty() {
            return Ok(Reply::text(format!(
                "以下题目的答案不正确：{}\n请使用 /擦除 修改后重新提交",
                wrong.join("、"),
            )));
        }

        self.complete(solver, record, puzzle, "恭喜你完成所有题目！")
    }

    fn query(
        &self,
        record: &SolverRecord,
        label: &str,
    ) -> Result<Reply, Error> {
        let Some(id) = record.current_puzzle
        else {
            return Ok(Reply::text(NO_PUZZLE));
        };

        let puzzle = self.catalog.lookup(id)?;

        if !puzzle.kind.is_grid() {
            return Ok(Reply::text(
                puzzle.prompt.as_deref().unwrap_or("当前题目没有文本内容"),
            ));
        }

        let Some(placement) = puzzle.placement(label)
        else {
            return Ok(Reply::text(format!(
                "未找到第{}题第{}题的内容",
                id,
                label,
            )));
        };

        let Some(clue) = &placement.clue
        else {
            return Ok(Reply::text("当前题目没有文本内容"));
        };

        Ok(Reply::text(format!(
            "第{}题 {}向第{}题：\n{}",
            id,
            placement.direction,
            label,
            clue,
        )))
    }

    fn erase(
        &self,
        solver: &str,
        record: &mut SolverRecord,
        label: &str,
    ) -> Result<Reply, Error> {
        let puzzle = match self.current(record)? {
            Some(puzzle) if puzzle.kind.is_grid() => puzzle,
            Some(_) => return Ok(Reply::text("当前题目没有可以擦除的答案")),
            None => return Ok(Reply::text(NO_PUZZLE)),
        };

        let Some(state) = record.game_state.as_mut()
        else {
            return Ok(Reply::text(TRY_AGAIN));
        };

        match state.erase(puzzle, label) {
            Ok(true) => Ok(Reply::with_image(
                format!("已擦除第{}题的答案", label),
                self.state_image(solver, state, puzzle)?,
            )),
            Ok(false) => Ok(Reply::text(format!("第{}题还没有填写答案", label))),
            Err(CommitError::UnknownClue(_)) => {
                Ok(Reply::text(format!("题号 {} 不存在", label)))
            },
            Err(e) => Err(e.into()),
        }
    }

    fn admin(
        &self,
        solver: &str,
        password: &str,
        action: Option<AdminAction>,
    ) -> Result<Reply, Error> {
        let Some(admin_password) = self.admin_password.as_deref()
        else {
            return Ok(Reply::text("管理员功能未启用"));
        };

        if password != admin_password {
            log::warn!("{} used the wrong admin password", solver);
            return Ok(Reply::text("密码错误"));
        }

        match action {
            None => Ok(Reply::text(command::ADMIN_USAGE)),
            Some(AdminAction::Clear) => {
                // Holding the map stops new commands from starting
                let locks = self.locks.lock();
                let _guards = locks.values()
                    .map(|lock| lock.lock())
                    .collect::<Vec<_>>();

                log::info!("{} cleared all solver records", solver);
                self.store.clear_all()?;
                Ok(Reply::text("已清除所有用户的答题记录"))
            },
            Some(AdminAction::Answer(id)) => {
                if !self.catalog.contains(id) {
                    return Ok(Reply::text(format!("题目 {} 不存在", id)));
                }

                let puzzle = self.catalog.lookup(id)?;

                match &puzzle.kind {
                    AnswerKind::FreeSequence { answer } => {
                        Ok(Reply::text(format!("第{}题答案：{}", id, answer)))
                    },
                    _ => Ok(Reply::with_image(
                        format!("第{}题答案：", id),
                        self.solution_image(puzzle)?,
                    )),
                }
            },
        }
    }
}

fn pass(solver: &str, record: &mut SolverRecord) -> Reply {
    let Some(id) = record.current_puzzle
    else {
        return Reply::text("请先选择题目");
    };

    log::info!("{} passed puzzle {}", solver, id);

    record.attempted.insert(id);
    record.last_puzzle = Some(id);
    record.clear_current();

    Reply::text(format!("已放弃第{}题", id))
}
