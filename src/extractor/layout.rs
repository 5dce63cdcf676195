//! 题块内的题干/选项划分

use super::normalize::{normalize_option, normalize_stem};
use super::policy::ExcessOptionPolicy;
use super::segment::{Block, Piece};
use super::RejectReason;
use crate::models::question::OPTION_COUNT;

/// 划分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub stem: String,
    pub options: [String; OPTION_COUNT],
    /// 是否有多余候选被并入题干
    pub folded: bool,
}

/// 把题块划分为题干和 4 个选项
///
/// 题块内有选项标记时按标记划分，否则首行为题干、其余各行为候选选项
pub(crate) fn lay_out(block: &Block<'_>, policy: ExcessOptionPolicy) -> Result<Layout, RejectReason> {
    let (mut stem_parts, mut candidates) = if block.has_options() {
        by_letter_markers(block)
    } else {
        by_fixed_window(block)
    };

    let found = candidates.len();
    if found < OPTION_COUNT {
        return Err(RejectReason::MalformedBlock { found });
    }

    let folded = found > OPTION_COUNT;
    if folded {
        if policy == ExcessOptionPolicy::Reject {
            return Err(RejectReason::ExcessOptions { found });
        }
        // 真正的选项总是最后 4 个
        stem_parts.extend(candidates.drain(..found - OPTION_COUNT));
    }

    let stem = normalize_stem(&stem_parts.join(" "));
    let mut options: [String; OPTION_COUNT] = Default::default();
    for (index, (slot, raw)) in options.iter_mut().zip(candidates.iter()).enumerate() {
        *slot = normalize_option(raw);
        if slot.is_empty() {
            return Err(RejectReason::EmptyOption { index });
        }
    }

    Ok(Layout {
        stem,
        options,
        folded,
    })
}

fn by_letter_markers(block: &Block<'_>) -> (Vec<String>, Vec<String>) {
    let mut stem_parts: Vec<String> = Vec::new();
    let mut candidates: Vec<String> = Vec::new();

    for piece in &block.pieces {
        match piece {
            Piece::Text(text) => attach(&mut stem_parts, &mut candidates, text),
            Piece::Options(line) => {
                if !line.prefix.is_empty() {
                    attach(&mut stem_parts, &mut candidates, line.prefix);
                }
                candidates.extend(line.options.iter().map(|o| o.to_string()));
            }
        }
    }

    (stem_parts, candidates)
}

/// 选项出现之前的文字归题干，之后的文字视为上一个选项的续行
fn attach(stem_parts: &mut Vec<String>, candidates: &mut [String], text: &str) {
    match candidates.last_mut() {
        Some(last) => {
            last.push(' ');
            last.push_str(text);
        }
        None => stem_parts.push(text.to_string()),
    }
}

fn by_fixed_window(block: &Block<'_>) -> (Vec<String>, Vec<String>) {
    let mut lines = block.pieces.iter().filter_map(|piece| match piece {
        Piece::Text(text) => Some(text.to_string()),
        Piece::Options(_) => None,
    });

    let stem_parts = lines.next().into_iter().collect();
    let candidates = lines.collect();
    (stem_parts, candidates)
}
