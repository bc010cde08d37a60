//! Path expressions: parenthesised groups, `/` for concatenation and atomic
//! tokens of the form `<label><+|->`. The parser splits on the rightmost
//! top-level `/`, so `a/b/c` nests to the left. Trees can be as deep as the
//! input is long, so every walk over them keeps an explicit stack.

use std::{fmt, mem, str::FromStr};

use crate::{errors::RpqError, graph::LabelId};

pub const CONCAT: char = '/';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabelAtom {
    pub label: LabelId,
    pub direction: Direction,
}

impl LabelAtom {
    pub fn forward(label: LabelId) -> Self {
        Self {
            label,
            direction: Direction::Forward,
        }
    }

    pub fn inverse(label: LabelId) -> Self {
        Self {
            label,
            direction: Direction::Inverse,
        }
    }

    pub fn is_inverse(&self) -> bool {
        self.direction == Direction::Inverse
    }

    /// Accepts exactly `<digits>+` or `<digits>-`.
    pub fn parse(token: &str) -> Result<Self, RpqError> {
        let (digits, direction) = if let Some(digits) = token.strip_suffix('+') {
            (digits, Direction::Forward)
        } else if let Some(digits) = token.strip_suffix('-') {
            (digits, Direction::Inverse)
        } else {
            return Err(RpqError::invalid_label(format!(
                "{token:?} lacks a +/- direction marker"
            )));
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RpqError::invalid_label(format!(
                "{token:?} does not start with a numeric label"
            )));
        }
        let label = digits
            .parse::<LabelId>()
            .map_err(|e| RpqError::invalid_label(format!("{token:?}: {e}")))?;
        Ok(Self { label, direction })
    }
}

impl FromStr for LabelAtom {
    type Err = RpqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelAtom::parse(s)
    }
}

impl fmt::Display for LabelAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.direction {
            Direction::Forward => '+',
            Direction::Inverse => '-',
        };
        write!(f, "{}{marker}", self.label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathExpr {
    Leaf(String),
    Concat(Box<PathExpr>, Box<PathExpr>),
    /// Reserved for single-operand operators such as a Kleene star. The
    /// parser never produces it and evaluation rejects it.
    Unary {
        operator: char,
        operand: Box<PathExpr>,
    },
}

enum Visit<'a> {
    Enter(&'a PathExpr),
    Exit(&'a PathExpr),
}

impl PathExpr {
    pub fn parse(input: &str) -> PathExpr {
        let stripped: String = input.chars().filter(|c| *c != ' ').collect();
        parse_stripped(&stripped)
    }

    pub fn leaf<T: Into<String>>(token: T) -> Self {
        PathExpr::Leaf(token.into())
    }

    pub fn concat(left: PathExpr, right: PathExpr) -> Self {
        PathExpr::Concat(Box::new(left), Box::new(right))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PathExpr::Leaf(_))
    }

    pub fn is_concat(&self) -> bool {
        matches!(self, PathExpr::Concat(..))
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, PathExpr::Unary { .. })
    }

    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                PathExpr::Leaf(token) => out.push(token.as_str()),
                PathExpr::Concat(left, right) => {
                    stack.push(&**right);
                    stack.push(&**left);
                }
                PathExpr::Unary { operand, .. } => stack.push(&**operand),
            }
        }
        out
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match node {
                PathExpr::Leaf(_) => {}
                PathExpr::Concat(left, right) => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
                PathExpr::Unary { operand, .. } => stack.push((&**operand, depth + 1)),
            }
        }
        deepest
    }

    /// Post-order fold, left child before right. The first error stops the walk.
    pub fn try_fold<T, L, C, U>(
        &self,
        mut leaf: L,
        mut concat: C,
        mut unary: U,
    ) -> Result<T, RpqError>
    where
        L: FnMut(&str) -> Result<T, RpqError>,
        C: FnMut(T, T) -> Result<T, RpqError>,
        U: FnMut(char, T) -> Result<T, RpqError>,
    {
        let mut visits = vec![Visit::Enter(self)];
        let mut values: Vec<T> = Vec::new();
        while let Some(visit) = visits.pop() {
            match visit {
                Visit::Enter(node) => match node {
                    PathExpr::Leaf(token) => values.push(leaf(token.as_str())?),
                    PathExpr::Concat(left, right) => {
                        visits.push(Visit::Exit(node));
                        visits.push(Visit::Enter(&**right));
                        visits.push(Visit::Enter(&**left));
                    }
                    PathExpr::Unary { operand, .. } => {
                        visits.push(Visit::Exit(node));
                        visits.push(Visit::Enter(&**operand));
                    }
                },
                Visit::Exit(node) => match node {
                    PathExpr::Leaf(_) => {}
                    PathExpr::Concat(..) => {
                        let (Some(right), Some(left)) = (values.pop(), values.pop()) else {
                            return Err(RpqError::invalid_query("concatenation lost an operand"));
                        };
                        values.push(concat(left, right)?);
                    }
                    PathExpr::Unary { operator, .. } => {
                        let Some(operand) = values.pop() else {
                            return Err(RpqError::invalid_query("unary operator lost its operand"));
                        };
                        values.push(unary(*operator, operand)?);
                    }
                },
            }
        }
        values
            .pop()
            .ok_or_else(|| RpqError::invalid_query("empty path expression"))
    }
}

impl Drop for PathExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

fn detach_children(node: &mut PathExpr, pending: &mut Vec<PathExpr>) {
    let mut detach = |child: &mut Box<PathExpr>| {
        if !child.is_leaf() {
            pending.push(mem::replace(&mut **child, PathExpr::Leaf(String::new())));
        }
    };
    match node {
        PathExpr::Leaf(_) => {}
        PathExpr::Concat(left, right) => {
            detach(left);
            detach(right);
        }
        PathExpr::Unary { operand, .. } => detach(operand),
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Some(self)];
        while let Some(item) = stack.pop() {
            match item {
                None => f.write_str(")")?,
                Some(PathExpr::Leaf(token)) => write!(f, " {token} ")?,
                Some(PathExpr::Concat(left, right)) => {
                    write!(f, "({CONCAT} ")?;
                    stack.push(None);
                    stack.push(Some(&**right));
                    stack.push(Some(&**left));
                }
                Some(PathExpr::Unary { operator, operand }) => {
                    write!(f, "({operator} ")?;
                    stack.push(None);
                    stack.push(Some(&**operand));
                }
            }
        }
        Ok(())
    }
}

enum ParseStep {
    Segment(usize, usize),
    Chain(usize),
}

fn parse_stripped(query: &str) -> PathExpr {
    let bytes = query.as_bytes();
    let partners = match_parens(bytes);
    let mut steps = vec![ParseStep::Segment(0, bytes.len())];
    let mut built: Vec<PathExpr> = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            ParseStep::Segment(start, end) => {
                let operands = split_top_level(bytes, &partners, start, end);
                if let [(start, end)] = operands[..] {
                    built.push(PathExpr::Leaf(query[start..end].to_string()));
                    continue;
                }
                steps.push(ParseStep::Chain(operands.len()));
                steps.extend(
                    operands
                        .iter()
                        .rev()
                        .map(|&(start, end)| ParseStep::Segment(start, end)),
                );
            }
            ParseStep::Chain(count) => {
                let mut operands = built.split_off(built.len() - count).into_iter();
                if let Some(first) = operands.next() {
                    built.push(operands.fold(first, PathExpr::concat));
                }
            }
        }
    }
    built.pop().unwrap_or_else(|| PathExpr::Leaf(String::new()))
}

fn match_parens(bytes: &[u8]) -> Vec<Option<usize>> {
    let mut partners = vec![None; bytes.len()];
    let mut open = Vec::new();
    for (idx, byte) in bytes.iter().enumerate() {
        match byte {
            b'(' => open.push(idx),
            b')' => {
                if let Some(start) = open.pop() {
                    partners[start] = Some(idx);
                    partners[idx] = Some(start);
                }
            }
            _ => {}
        }
    }
    partners
}

fn wrapped_in_parens(
    bytes: &[u8],
    partners: &[Option<usize>],
    start: usize,
    end: usize,
) -> bool {
    end - start >= 2 && bytes[start] == b'(' && partners[start] == Some(end - 1)
}

fn split_top_level(
    bytes: &[u8],
    partners: &[Option<usize>],
    mut start: usize,
    mut end: usize,
) -> Vec<(usize, usize)> {
    let mut rights = Vec::new();
    'segment: loop {
        while wrapped_in_parens(bytes, partners, start, end) {
            start += 1;
            end -= 1;
        }
        let mut level: i64 = 0;
        let mut idx = end;
        while idx > start {
            idx -= 1;
            let byte = bytes[idx];
            match byte {
                b')' => match partners[idx] {
                    // A balanced group holds no top-level `/`.
                    Some(open) if level >= 0 && open >= start => idx = open,
                    _ => level += 1,
                },
                b'(' => level -= 1,
                b'/' if level <= 0 => {
                    rights.push((idx + 1, end));
                    end = idx;
                    continue 'segment;
                }
                _ => {}
            }
        }
        break;
    }
    let mut operands = Vec::with_capacity(rights.len() + 1);
    operands.push((start, end));
    operands.extend(rights.into_iter().rev());
    operands
}
