//! 题块切分
//!
//! 逐行扫描，把输入切成一个个题块，每完成一个就交出去，不缓存整份结果

use super::line::{classify, classify_content, LineKind, OptionLine};
use super::policy::SegmentationStrategy;
use std::collections::VecDeque;

/// 题块中的一段内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Text(&'a str),
    Options(OptionLine<'a>),
}

/// 一个题块：从题目开始标记到答案（或下一题）为止
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    /// 显式题号
    pub number: Option<u32>,
    pub pieces: Vec<Piece<'a>>,
    /// 行内答案字母
    pub answer: Option<char>,
    /// 题块首行在输入中的下标
    pub first_line: usize,
}

impl<'a> Block<'a> {
    fn new(number: Option<u32>, first_line: usize) -> Self {
        Self {
            number,
            pieces: Vec::new(),
            answer: None,
            first_line,
        }
    }

    fn push_text(&mut self, text: &'a str) {
        if !text.is_empty() {
            self.pieces.push(Piece::Text(text));
        }
    }

    fn push(&mut self, kind: LineKind<'a>) {
        match kind {
            LineKind::Text(text) => self.push_text(text),
            LineKind::Options(options) => self.pieces.push(Piece::Options(options)),
            LineKind::Question { rest, .. } => self.push_text(rest),
            LineKind::Answer { content, .. } => self.push_text(content),
            LineKind::Ignored => {}
        }
    }

    pub fn has_options(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Options(_)))
    }

    /// 已收集的选项候选数（按选项标记计）
    pub fn marked_option_count(&self) -> usize {
        self.pieces
            .iter()
            .map(|p| match p {
                Piece::Options(line) => line.options.len(),
                Piece::Text(_) => 0,
            })
            .sum()
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// 根据输入内容确定实际使用的切分策略
pub(crate) fn resolve_strategy<S: AsRef<str>>(
    strategy: SegmentationStrategy,
    lines: &[S],
) -> SegmentationStrategy {
    if strategy != SegmentationStrategy::Auto {
        return strategy;
    }

    let mut has_answers = false;
    for line in lines {
        match classify(line.as_ref()) {
            LineKind::Question { .. } => return SegmentationStrategy::QuestionNumbers,
            LineKind::Answer { .. } => has_answers = true,
            _ => {}
        }
    }

    if has_answers {
        SegmentationStrategy::AnswerMarkers
    } else {
        SegmentationStrategy::OptionRuns
    }
}

/// 题块切分器，惰性产出 [`Block`]
pub(crate) struct Segmenter<'a, S> {
    lines: &'a [S],
    position: usize,
    strategy: SegmentationStrategy,
    current: Option<Block<'a>>,
    ready: VecDeque<Block<'a>>,
}

impl<'a, S: AsRef<str>> Segmenter<'a, S> {
    pub fn new(lines: &'a [S], strategy: SegmentationStrategy) -> Self {
        Self {
            lines,
            position: 0,
            strategy: resolve_strategy(strategy, lines),
            current: None,
            ready: VecDeque::new(),
        }
    }

    pub fn strategy(&self) -> SegmentationStrategy {
        self.strategy
    }

    fn finish_current(&mut self) {
        if let Some(block) = self.current.take() {
            if !block.is_empty() {
                self.ready.push_back(block);
            }
        }
    }

    fn close_with_answer(&mut self, letter: char) {
        if let Some(block) = self.current.as_mut() {
            block.answer = Some(letter);
        }
        self.finish_current();
    }

    /// 按选项数结束的题块，紧随其后的单独答案行仍属于它
    fn take_trailing_answer(&mut self, block: &mut Block<'a>) {
        if self.strategy != SegmentationStrategy::OptionRuns || block.answer.is_some() {
            return;
        }
        let lines = self.lines;
        let mut position = self.position;
        while let Some(line) = lines.get(position) {
            match classify(line.as_ref()) {
                LineKind::Ignored => position += 1,
                LineKind::Answer { content: "", letter } => {
                    block.answer = Some(letter);
                    self.position = position + 1;
                    return;
                }
                _ => return,
            }
        }
    }

    fn feed(&mut self, index: usize, line: &'a str) {
        match classify(line) {
            LineKind::Ignored => {}
            LineKind::Answer { content, letter } => {
                // 答案标记之前的正文照常处理，再用答案结束题块
                let finished_before = self.ready.len();
                let content = classify_content(content);
                if !matches!(content, LineKind::Ignored) {
                    self.feed_content(index, content);
                }
                if self.current.is_some() {
                    self.close_with_answer(letter);
                } else if self.ready.len() > finished_before {
                    // 正文本身已经凑满选项并结束了题块
                    if let Some(block) = self.ready.back_mut() {
                        block.answer.get_or_insert(letter);
                    }
                }
            }
            kind => self.feed_content(index, kind),
        }
    }

    fn feed_content(&mut self, index: usize, kind: LineKind<'a>) {
        match self.strategy {
            SegmentationStrategy::QuestionNumbers | SegmentationStrategy::Auto => {
                self.feed_by_numbers(index, kind)
            }
            SegmentationStrategy::AnswerMarkers => self.feed_by_answers(index, kind),
            SegmentationStrategy::OptionRuns => self.feed_by_option_runs(index, kind),
        }
    }

    /// 题号开启题块；题号之前、答案之后的内容丢弃
    fn feed_by_numbers(&mut self, index: usize, kind: LineKind<'a>) {
        match kind {
            LineKind::Question { number, rest } => {
                self.finish_current();
                let mut block = Block::new(Some(number), index);
                block.push(classify_content_or_text(rest));
                self.current = Some(block);
            }
            other => {
                if let Some(block) = self.current.as_mut() {
                    block.push(other);
                }
            }
        }
    }

    /// 上一题答案之后的第一行开启新题块
    fn feed_by_answers(&mut self, index: usize, kind: LineKind<'a>) {
        match kind {
            LineKind::Question { number, rest } => {
                let block = self
                    .current
                    .get_or_insert_with(|| Block::new(Some(number), index));
                if block.is_empty() && block.number.is_none() {
                    block.number = Some(number);
                }
                block.push(classify_content_or_text(rest));
            }
            other => {
                self.current
                    .get_or_insert_with(|| Block::new(None, index))
                    .push(other);
            }
        }
    }

    /// 题干累积到出现选项；凑满 4 个选项或选项之后又出现正文时结束题块
    fn feed_by_option_runs(&mut self, index: usize, kind: LineKind<'a>) {
        match kind {
            LineKind::Options(options) => {
                let block = self.current.get_or_insert_with(|| Block::new(None, index));
                block.pieces.push(Piece::Options(options));
                if block.marked_option_count() >= 4 {
                    self.finish_current();
                }
            }
            LineKind::Question { number, rest } => {
                self.finish_current();
                let mut block = Block::new(Some(number), index);
                block.push(classify_content_or_text(rest));
                let full = block.marked_option_count() >= 4;
                self.current = Some(block);
                if full {
                    self.finish_current();
                }
            }
            other => {
                if self.current.as_ref().is_some_and(|b| b.has_options()) {
                    self.finish_current();
                }
                self.current
                    .get_or_insert_with(|| Block::new(None, index))
                    .push(other);
            }
        }
    }
}

/// 题号之后的正文可能直接跟着一串选项，题号不再二次识别
fn classify_content_or_text(rest: &str) -> LineKind<'_> {
    match classify_content(rest) {
        LineKind::Question { .. } => LineKind::Text(rest),
        kind => kind,
    }
}

impl<'a, S: AsRef<str>> Iterator for Segmenter<'a, S> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines;
        loop {
            if let Some(mut block) = self.ready.pop_front() {
                if self.ready.is_empty() && self.current.is_none() {
                    self.take_trailing_answer(&mut block);
                }
                return Some(block);
            }

            if self.position >= lines.len() {
                self.finish_current();
                return self.ready.pop_front();
            }

            let index = self.position;
            self.position += 1;
            self.feed(index, lines[index].as_ref());
        }
    }
}
