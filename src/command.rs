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

use super::numerals;
use std::str::FromStr;

pub const HELP_TEXT: &str = "\
填字游戏使用说明：
1. 使用 /选择题目 或者/x 第X题 来选择要回答的题目（支持中文数字，如：第一题）
2. 使用 /作答 或者/z 题号 答案 来提交答案
   - 横向题目用数字表示：1, 2, 3...
   - 竖向题目用中文数字表示：一, 二, 三...
3. 使用 /转换 或者/sw 在假名和罗马音之间切换
4. 使用 /查询 或者/c 题号 查询题目内容
5. 使用 /擦除 或者/d 题号 擦除已填写的答案
6. 使用 /提交 或者/t 提交需要整体检查的答案
7. 使用 /pass 或者/p 放弃当前题目
8. 使用 /admin 或者/ad 密码 answer 题号 查看答案（管理员功能）

注意：
- 放弃或作答过的题目不能再换回来，除非是刚刚放弃的那一道";

pub const ADMIN_USAGE: &str = "\
格式错误，请使用：/admin 密码 [命令] [参数]
可用命令：
- clear: 清除所有用户的答题记录
- answer 题号: 查看指定题目的答案";

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AdminAction {
    Clear,
    Answer(u32),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Help,
    Select(u32),
    Answer {
        label: String,
        text: String,
    },
    ToggleDisplay,
    Pass,
    Submit,
    Query(String),
    Erase(String),
    Admin {
        password: String,
        action: Option<AdminAction>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Name {
    Help,
    Select,
    Answer,
    ToggleDisplay,
    Pass,
    Submit,
    Query,
    Erase,
    Admin,
}

static NAMES: [(&str, Name); 26] = [
    ("help", Name::Help),
    ("帮助", Name::Help),
    ("select", Name::Select),
    ("x", Name::Select),
    ("选择题目", Name::Select),
    ("answer", Name::Answer),
    ("z", Name::Answer),
    ("作答", Name::Answer),
    ("toggle", Name::ToggleDisplay),
    ("toggle-display", Name::ToggleDisplay),
    ("sw", Name::ToggleDisplay),
    ("转换", Name::ToggleDisplay),
    ("pass", Name::Pass),
    ("abandon", Name::Pass),
    ("p", Name::Pass),
    ("submit", Name::Submit),
    ("t", Name::Submit),
    ("提交", Name::Submit),
    ("query", Name::Query),
    ("c", Name::Query),
    ("查询", Name::Query),
    ("erase", Name::Erase),
    ("d", Name::Erase),
    ("擦除", Name::Erase),
    ("admin", Name::Admin),
    ("ad", Name::Admin),
];

#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("请输入命令，使用 /help 查看帮助")]
    Empty,
    #[error("未知命令：{0}，使用 /help 查看帮助")]
    UnknownCommand(String),
    #[error("格式错误，请使用：{0}")]
    Usage(&'static str),
    #[error("题号格式错误，请使用阿拉伯数字或中文数字")]
    BadPuzzleReference(String),
    #[error("{}", ADMIN_USAGE)]
    AdminUsage,
}

fn lookup_name(word: &str) -> Option<Name> {
    NAMES.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|&(_, name)| name)
}

// Chat users often leave out the space after the command, as in
// “/x第一题”. Only accept that when the argument can’t be mistaken
// for the rest of a longer command name.
fn split_joined(word: &str) -> Option<(Name, &str)> {
    NAMES.iter().find_map(|&(name_str, name)| {
        let rest = word.strip_prefix(name_str)?;
        let first = rest.chars().next()?;

        (!first.is_ascii()).then_some((name, rest))
    })
}

fn one_argument<'a, I>(
    mut args: I,
    usage: &'static str,
) -> Result<&'a str, ParseError>
    where I: Iterator<Item = &'a str>
{
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn no_arguments<'a, I>(
    mut args: I,
    usage: &'static str,
) -> Result<(), ParseError>
    where I: Iterator<Item = &'a str>
{
    match args.next() {
        None => Ok(()),
        Some(_) => Err(ParseError::Usage(usage)),
    }
}

fn parse_admin<'a, I>(mut args: I) -> Result<Command, ParseError>
    where I: Iterator<Item = &'a str>
{
    let Some(password) = args.next()
    else {
        return Err(ParseError::AdminUsage);
    };

    let action = match args.next() {
        None => None,
        Some(word) if word.eq_ignore_ascii_case("clear") => {
            Some(AdminAction::Clear)
        },
        Some(word) if word.eq_ignore_ascii_case("answer") => {
            let usage = "/admin 密码 answer 题号";

            let Some(puzzle) = one_argument(args.by_ref(), usage)
                .ok()
                .and_then(numerals::parse_puzzle_reference)
            else {
                return Err(ParseError::Usage(usage));
            };

            Some(AdminAction::Answer(puzzle))
        },
        Some(_) => return Err(ParseError::AdminUsage),
    };

    if args.next().is_some() {
        return Err(ParseError::AdminUsage);
    }

    Ok(Command::Admin { password: password.to_string(), action })
}

fn parse_select(arg: &str) -> Result<Command, ParseError> {
    numerals::parse_puzzle_reference(arg)
        .map(Command::Select)
        .ok_or_else(|| ParseError::BadPuzzleReference(arg.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Command, ParseError> {
        let s = s.trim();
        let s = s.strip_prefix('/').unwrap_or(s);

        let mut words = s.split_whitespace();

        let Some(first) = words.next()
        else {
            return Err(ParseError::Empty);
        };

        let (name, joined) = match lookup_name(first) {
            Some(name) => (name, None),
            None => match split_joined(first) {
                Some((name, rest)) => (name, Some(rest)),
                None => {
                    return Err(ParseError::UnknownCommand(first.to_string()));
                },
            },
        };

        let mut args = joined.into_iter().chain(words);

        match name {
            Name::Help => Ok(Command::Help),
            Name::Select => {
                let arg = one_argument(
                    args,
                    "/选择题目 或者/x 第X题（支持中文数字）",
                )?;
                parse_select(arg)
            },
            Name::Answer => {
                let usage = "/作答 或者/z 题号 答案";
                let Some(label) = args.next()
                else {
                    return Err(ParseError::Usage(usage));
                };

                let text = args.collect::<Vec<_>>().join(" ");

                if text.is_empty() {
                    return Err(ParseError::Usage(usage));
                }

                Ok(Command::Answer { label: label.to_string(), text })
            },
            Name::ToggleDisplay => {
                no_arguments(args, "/转换 或者/sw")?;
                Ok(Command::ToggleDisplay)
            },
            Name::Pass => {
                no_arguments(args, "/pass 或者/p")?;
                Ok(Command::Pass)
            },
            Name::Submit => {
                no_arguments(args, "/提交 或者/t")?;
                Ok(Command::Submit)
            },
            Name::Query => {
                let label = one_argument(
                    args,
                    "/查询 或者/c 题号（支持中文数字）",
                )?;
                Ok(Command::Query(label.to_string()))
            },
            Name::Erase => {
                let label = one_argument(
                    args,
                    "/擦除 或者/d 题号（支持中文数字）",
                )?;
                Ok(Command::Erase(label.to_string()))
            },
            Name::Admin => parse_admin(args),
        }
    }
}
