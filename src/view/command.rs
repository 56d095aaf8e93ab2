//! 终端输入解析
//!
//! 普通文本按逐字输入处理：每个前缀都是一次搜索框变化，与浏览器中逐键触发搜索一致。
//! 以 `/` 开头的行为命令，空行相当于按下 Enter。

use super::UiEvent;
use super::keyboard::Key;
use crate::models::Algorithm;

/// 一行输入解析出的动作
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Key(Key),
    Ui(UiEvent),
    Stats,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("未知命令: {0}（输入 /help 查看帮助）")]
    Unknown(String),

    #[error("{command} 需要一个从 1 开始的序号")]
    InvalidIndex { command: String },

    #[error(transparent)]
    Algorithm(#[from] crate::models::algorithm::UnknownAlgorithm),
}

pub const HELP: &str = "\
<text>      live search (typed keystroke by keystroke)
<empty>     Enter
/pick N     choose search result N
/algo NAME  default | jaccard | cosine | minhash
/next       next page
/prev       previous page
/open N     open card N of the current page
/close      close the detail overlay
/backdrop   click outside the detail card
/esc        Escape
/clear      clear the search box
/reset      back to the start screen
/stats      client metrics
/quit       exit";

/// 解析一行终端输入
pub fn parse_line(line: &str) -> Result<Vec<Input>, CommandError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);

    if trimmed.trim().is_empty() {
        return Ok(vec![Input::Key(Key::Enter)]);
    }

    let Some(command) = trimmed.trim_start().strip_prefix('/') else {
        return Ok(keystrokes(trimmed));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.collect::<Vec<_>>().join(" ");

    let input = match name.as_str() {
        "pick" => Input::Ui(UiEvent::CandidateChosen(index(&name, &argument)?)),
        "open" => Input::Ui(UiEvent::CardChosen(index(&name, &argument)?)),
        "algo" => Input::Ui(UiEvent::AlgorithmChosen(argument.parse::<Algorithm>()?)),
        "next" => Input::Ui(UiEvent::NextPage),
        "prev" => Input::Ui(UiEvent::PrevPage),
        "close" => Input::Ui(UiEvent::OverlayCloseClicked),
        "backdrop" => Input::Ui(UiEvent::OverlayBackdropClicked),
        "esc" => Input::Key(Key::Escape),
        "clear" => Input::Ui(UiEvent::QueryChanged(String::new())),
        "reset" => Input::Ui(UiEvent::ResetClicked),
        "stats" => Input::Stats,
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        _ => return Err(CommandError::Unknown(format!("/{}", name))),
    };
    Ok(vec![input])
}

fn keystrokes(text: &str) -> Vec<Input> {
    text.char_indices()
        .map(|(i, c)| Input::Ui(UiEvent::QueryChanged(text[..i + c.len_utf8()].to_string())))
        .collect()
}

fn index(command: &str, argument: &str) -> Result<usize, CommandError> {
    match argument.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidIndex {
            command: format!("/{}", command),
        }),
    }
}
