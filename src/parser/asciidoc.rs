//! AsciiDoc reader.
//!
//! Reads the part of AsciiDoc that protocol descriptions are written in:
//! section headings, block titles, attribute lists, delimited blocks and
//! `|===` tables. Everything else becomes paragraph text. Inline markup is
//! left untouched.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{DocumentNode, TableBlock};

use super::options::{ErrorMode, ReadOptions};

/// Reader that turns AsciiDoc source into a [`DocumentNode`] tree.
pub struct AsciidocReader {
    options: ReadOptions,
    heading: Regex,
    block_title: Regex,
    attribute_list: Regex,
    attribute_entry: Regex,
    table_delimiter: Regex,
    cell_spec: Regex,
    header_option: Regex,
    cols: Regex,
}

/// Kinds of delimited blocks other than tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimited {
    /// Sidebar, example or quote block; content is parsed
    Container,
    /// Listing, literal or passthrough block; content is kept verbatim
    Raw,
    /// Comment block; content is dropped
    Comment,
}

fn classify_delimiter(line: &str) -> Option<Delimited> {
    let first = line.chars().next()?;
    if line.len() < 4 || !line.chars().all(|c| c == first) {
        return None;
    }
    match first {
        '*' | '=' | '_' => Some(Delimited::Container),
        '-' | '.' | '+' => Some(Delimited::Raw),
        '/' => Some(Delimited::Comment),
        _ => None,
    }
}

impl AsciidocReader {
    /// Create a reader with default options.
    pub fn new() -> Self {
        Self::with_options(ReadOptions::default())
    }

    /// Create a reader with custom options.
    pub fn with_options(options: ReadOptions) -> Self {
        Self {
            options,
            heading: static_regex(r"^(={1,6})\s+(\S.*?)(?:\s+=+)?$"),
            block_title: static_regex(r"^\.([^.\s].*)$"),
            attribute_list: static_regex(r"^\[(.*)\]$"),
            attribute_entry: static_regex(r"^:!?[\w][\w-]*!?:(\s.*)?$"),
            table_delimiter: static_regex(r"^\|={3,}$"),
            cell_spec: static_regex(
                r"^(?:(?P<repeat>\d+)\*|(?P<colspan>\d+)?(?:\.(?P<rowspan>\d+))?\+)?[<^>]?(?:\.[<^>])?[adehlmsv]?$",
            ),
            header_option: static_regex(r#"(?:options|opts)\s*=\s*"?[^"\]]*\bheader\b|%header"#),
            cols: static_regex(r#"cols\s*=\s*"([^"]*)""#),
        }
    }

    /// Read an AsciiDoc file.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentNode> {
        let source = fs::read_to_string(path)?;
        self.read_str(&source)
    }

    /// Read AsciiDoc source text.
    pub fn read_str(&self, source: &str) -> Result<DocumentNode> {
        let lines: Vec<&str> = source.lines().collect();
        let mut builder = TreeBuilder::new(&self.options);
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i].trim_end();
            let line_no = i + 1;
            i += 1;

            if line.trim().is_empty() {
                builder.flush_paragraph();
                continue;
            }

            if let Some(kind) = classify_delimiter(line) {
                builder.flush_paragraph();
                match kind {
                    Delimited::Container if builder.closes_top(line) => builder.close_top(),
                    Delimited::Container => builder.open_block(line, line_no),
                    Delimited::Raw | Delimited::Comment => {
                        let (body, next) = self.collect_until(&lines, i, line, line_no)?;
                        i = next;
                        if kind == Delimited::Raw {
                            builder.add_literal(body.join("\n"));
                        } else {
                            builder.discard_pending();
                        }
                    }
                }
                continue;
            }

            if self.table_delimiter.is_match(line) {
                builder.flush_paragraph();
                let (body, next) = self.collect_until(&lines, i, line, line_no)?;
                i = next;
                let attrs = builder.pending_attrs.take();
                let table = self.read_table(&body, attrs.as_deref(), line_no)?;
                debug!(
                    "table at line {}: {} columns, {} rows",
                    line_no,
                    table.column_count(),
                    table.row_count()
                );
                builder.add_table(table);
                continue;
            }

            if line.starts_with("//") {
                continue;
            }

            if !builder.in_delimited_block() {
                if let Some(caps) = self.heading.captures(line) {
                    builder.flush_paragraph();
                    let level = (caps[1].len() - 1) as u8;
                    let title = caps[2].trim().to_string();
                    if level == 0 && builder.accepts_document_title() {
                        builder.root.title = Some(title);
                    } else {
                        builder.open_section(title, level.max(1));
                    }
                    continue;
                }
            }

            if builder.paragraph.is_empty() {
                if let Some(caps) = self.block_title.captures(line) {
                    builder.pending_title = Some(caps[1].trim().to_string());
                    continue;
                }
                if let Some(caps) = self.attribute_list.captures(line) {
                    // [[anchor]] lines carry no block attributes
                    if !line.starts_with("[[") {
                        builder.pending_attrs = Some(caps[1].to_string());
                    }
                    continue;
                }
                if self.attribute_entry.is_match(line) {
                    continue;
                }
            }

            builder.paragraph.push(line.trim().to_string());
        }

        builder.finish()
    }

    /// Collect lines up to the matching closing delimiter.
    ///
    /// Returns the body lines and the index of the line after the closing
    /// delimiter.
    fn collect_until<'s>(
        &self,
        lines: &[&'s str],
        start: usize,
        delimiter: &str,
        open_line: usize,
    ) -> Result<(Vec<&'s str>, usize)> {
        let end = lines[start..]
            .iter()
            .position(|l| l.trim_end() == delimiter)
            .map(|offset| start + offset);

        match end {
            Some(end) => Ok((lines[start..end].to_vec(), end + 1)),
            None => match self.options.error_mode {
                ErrorMode::Strict => Err(Error::Parse {
                    line: open_line,
                    message: format!("unterminated block {:?}", delimiter),
                }),
                ErrorMode::Lenient => {
                    warn!(
                        "block {:?} opened at line {} is never closed",
                        delimiter, open_line
                    );
                    Ok((lines[start..].to_vec(), lines.len()))
                }
            },
        }
    }

    /// Build a table from the lines between its delimiters.
    ///
    /// Cells are laid into rows of the declared (or first line's) column
    /// count, honouring column spans, row spans and duplication. A cell that
    /// spans past the last column is a parse error in strict mode.
    fn read_table(&self, body: &[&str], attrs: Option<&str>, open_line: usize) -> Result<TableBlock> {
        let Some(first) = body.iter().position(|l| !l.trim().is_empty()) else {
            return Ok(TableBlock::new());
        };

        let explicit_header = attrs.is_some_and(|a| self.header_option.is_match(a));
        // A first line followed by a blank line is an implicit header row.
        let implicit_header = body[first].trim_start().starts_with('|')
            && body.get(first + 1).is_some_and(|l| l.trim().is_empty());

        let mut cells: Vec<RawCell> = Vec::new();
        let mut first_line_slots = 0;
        for (n, line) in body[first..].iter().enumerate() {
            let slots = self.split_cells(line, open_line + 1 + first + n, &mut cells);
            if n == 0 {
                first_line_slots = slots;
            }
        }

        let columns = attrs
            .and_then(|a| self.declared_columns(a))
            .filter(|&c| c > 0)
            .unwrap_or(first_line_slots.max(1));

        if self.options.trim_cells {
            for cell in &mut cells {
                cell.text = cell.text.trim().to_string();
            }
        }

        let mut rows = self.assemble_rows(&cells, columns)?;

        let mut table = TableBlock::new();
        if (explicit_header || implicit_header) && !rows.is_empty() {
            table.header = rows.remove(0);
        }
        table.rows = rows;
        Ok(table)
    }

    fn assemble_rows(&self, cells: &[RawCell], columns: usize) -> Result<Vec<Vec<String>>> {
        let mut grid = RowGrid::new(columns);

        for cell in cells {
            for _ in 0..cell.spec.repeat {
                let overflow = grid.place(&cell.text, cell.spec.colspan, cell.spec.rowspan);
                if overflow == 0 {
                    continue;
                }
                let message = format!(
                    "cell {:?} spans {} columns, {} past the last column",
                    cell.text, cell.spec.colspan, overflow
                );
                match self.options.error_mode {
                    ErrorMode::Strict => {
                        return Err(Error::Parse {
                            line: cell.line,
                            message,
                        })
                    }
                    ErrorMode::Lenient => warn!("line {}: {}", cell.line, message),
                }
            }
        }

        let (rows, short) = grid.finish();
        if let Some(filled) = short {
            warn!("table row has {} of {} cells", filled, columns);
        }
        Ok(rows)
    }

    /// Split one table line into cells, appending to `cells`.
    ///
    /// Text before the first `|` continues the previous cell unless it is a
    /// cell specifier such as `2+`. A specifier may also end the text before
    /// any later `|` when whitespace separates it from the cell content, as
    /// in `|6-7 |2 2+|Repeat`. Returns the number of column slots started.
    fn split_cells(&self, line: &str, line_no: usize, cells: &mut Vec<RawCell>) -> usize {
        let escaped = line.replace("\\|", "\u{0}");
        let pieces: Vec<&str> = escaped.split('|').collect();
        let unescape = |text: &str| text.replace('\u{0}', "|");

        let (lead, mut spec) = if pieces.len() > 1 {
            self.take_spec(pieces[0], true)
        } else {
            (pieces[0], None)
        };
        let lead = lead.trim();
        if !lead.is_empty() {
            if let Some(last) = cells.last_mut() {
                if !last.text.trim().is_empty() {
                    last.text.push(' ');
                }
                last.text.push_str(&unescape(lead));
            }
        }

        let mut slots = 0;
        for (n, piece) in pieces.iter().enumerate().skip(1) {
            let (text, next) = if n + 1 < pieces.len() {
                self.take_spec(piece, false)
            } else {
                (*piece, None)
            };
            let cell_spec = spec.take().unwrap_or_default();
            slots += cell_spec.colspan * cell_spec.repeat;
            cells.push(RawCell {
                text: unescape(text),
                spec: cell_spec,
                line: line_no,
            });
            spec = next;
        }
        slots
    }

    /// Split a trailing cell specifier off `segment`.
    ///
    /// The specifier must follow whitespace, or open the line.
    fn take_spec<'s>(&self, segment: &'s str, line_start: bool) -> (&'s str, Option<CellSpec>) {
        let start = match segment
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
        {
            Some((i, c)) => i + c.len_utf8(),
            None if line_start => 0,
            None => return (segment, None),
        };
        match self.parse_spec(&segment[start..]) {
            Some(spec) => (&segment[..start], Some(spec)),
            None => (segment, None),
        }
    }

    /// Parse `2+`, `.3+`, `2.3+`, `3*`, optionally followed by alignment and
    /// style. A bare style letter such as `e` is cell text, not a specifier.
    fn parse_spec(&self, token: &str) -> Option<CellSpec> {
        if !token.contains(|c: char| matches!(c, '*' | '+' | '<' | '^' | '>')) {
            return None;
        }
        let caps = self.cell_spec.captures(token)?;
        let number = |name: &str| -> Option<Option<usize>> {
            match caps.name(name) {
                Some(m) => m.as_str().parse::<usize>().ok().filter(|&n| n > 0).map(Some),
                None => Some(None),
            }
        };
        let colspan = number("colspan")?;
        let rowspan = number("rowspan")?;
        let repeat = number("repeat")?;
        if token.contains('+') && colspan.is_none() && rowspan.is_none() {
            return None;
        }
        Some(CellSpec {
            colspan: colspan.unwrap_or(1),
            rowspan: rowspan.unwrap_or(1),
            repeat: repeat.unwrap_or(1),
        })
    }

    /// Column count declared by a `cols` attribute, e.g. `"1,3,2"` or `"4*"`.
    fn declared_columns(&self, attrs: &str) -> Option<usize> {
        let caps = self.cols.captures(attrs)?;
        let spec = caps.get(1)?.as_str();
        let count = spec
            .split(|c| c == ',' || c == ';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('*') {
                Some((n, _)) => n.trim().parse::<usize>().unwrap_or(1),
                None => 1,
            })
            .sum();
        Some(count)
    }
}

impl Default for AsciidocReader {
    fn default() -> Self {
        Self::new()
    }
}

fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// Spans and duplication of one table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpec {
    colspan: usize,
    rowspan: usize,
    repeat: usize,
}

impl Default for CellSpec {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            repeat: 1,
        }
    }
}

/// A cell as written in the source, before it is laid into rows.
struct RawCell {
    text: String,
    spec: CellSpec,
    line: usize,
}

/// Lays cells into fixed-width rows. Slots covered by a span read as `""`.
struct RowGrid {
    columns: usize,
    rows: Vec<Vec<String>>,
    current: Vec<Option<String>>,
    /// Rows still covered by a row span, per column
    carried: Vec<usize>,
    started: bool,
}

impl RowGrid {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            current: vec![None; columns],
            carried: vec![0; columns],
            started: false,
        }
    }

    /// Place a cell at the next free slot. Returns how many of its columns
    /// did not fit in the row.
    fn place(&mut self, text: &str, colspan: usize, rowspan: usize) -> usize {
        let col = self.next_free();
        let mut placed = 0;
        for (offset, slot) in self.current[col..].iter_mut().take(colspan).enumerate() {
            if slot.is_some() {
                break;
            }
            *slot = Some(if offset == 0 { text.to_string() } else { String::new() });
            placed += 1;
        }
        for carried in &mut self.carried[col..col + placed] {
            *carried = (*carried).max(rowspan - 1);
        }
        self.started = true;
        colspan - placed
    }

    fn next_free(&mut self) -> usize {
        loop {
            if let Some(col) = self.current.iter().position(Option::is_none) {
                return col;
            }
            self.close_row();
        }
    }

    fn close_row(&mut self) {
        let row = std::mem::replace(&mut self.current, vec![None; self.columns]);
        self.rows.push(row.into_iter().map(Option::unwrap_or_default).collect());
        for (col, carried) in self.carried.iter_mut().enumerate() {
            if *carried > 0 {
                self.current[col] = Some(String::new());
                *carried -= 1;
            }
        }
        self.started = false;
    }

    /// Finish the grid. A trailing partial row is kept as a short row and
    /// its cell count returned.
    fn finish(mut self) -> (Vec<Vec<String>>, Option<usize>) {
        if self.started && self.current.iter().all(Option::is_some) {
            self.close_row();
        }
        if !self.started {
            return (self.rows, None);
        }
        let row: Vec<String> = self.current.into_iter().map_while(|slot| slot).collect();
        let filled = row.len();
        self.rows.push(row);
        (self.rows, Some(filled))
    }
}

/// An open container while building the tree.
struct Frame {
    node: DocumentNode,
    /// Closing delimiter for delimited blocks, `None` for sections
    delimiter: Option<String>,
    line: usize,
}

/// Incremental tree construction state.
struct TreeBuilder<'o> {
    options: &'o ReadOptions,
    root: DocumentNode,
    stack: Vec<Frame>,
    pending_title: Option<String>,
    pending_attrs: Option<String>,
    paragraph: Vec<String>,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ReadOptions) -> Self {
        Self {
            options,
            root: DocumentNode::document(None),
            stack: Vec::new(),
            pending_title: None,
            pending_attrs: None,
            paragraph: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut DocumentNode {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.node,
            None => &mut self.root,
        }
    }

    fn current_level(&self) -> u8 {
        self.stack.last().map(|f| f.node.level).unwrap_or(0)
    }

    fn in_delimited_block(&self) -> bool {
        self.stack.last().is_some_and(|f| f.delimiter.is_some())
    }

    fn accepts_document_title(&self) -> bool {
        self.root.title.is_none() && self.stack.is_empty() && !self.root.has_children()
    }

    fn closes_top(&self, delimiter: &str) -> bool {
        self.stack
            .last()
            .is_some_and(|f| f.delimiter.as_deref() == Some(delimiter))
    }

    fn discard_pending(&mut self) {
        self.pending_title = None;
        self.pending_attrs = None;
    }

    fn push_node(&mut self, mut node: DocumentNode) {
        if node.title.is_none() {
            node.title = self.pending_title.take();
        }
        self.discard_pending();
        self.current().add_child(node);
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.current().add_child(frame.node);
        }
    }

    fn open_section(&mut self, title: String, level: u8) {
        while self
            .stack
            .last()
            .is_some_and(|f| f.delimiter.is_none() && f.node.level >= level)
        {
            self.close_top();
        }
        self.discard_pending();
        self.stack.push(Frame {
            node: DocumentNode::section(title, level),
            delimiter: None,
            line: 0,
        });
    }

    fn open_block(&mut self, delimiter: &str, line: usize) {
        let mut node = DocumentNode::block(self.current_level() + 1);
        node.title = self.pending_title.take();
        self.discard_pending();
        self.stack.push(Frame {
            node,
            delimiter: Some(delimiter.to_string()),
            line,
        });
    }

    fn add_table(&mut self, table: TableBlock) {
        let node = DocumentNode::table(table, self.current_level() + 1);
        self.push_node(node);
    }

    fn add_literal(&mut self, text: String) {
        if self.options.keep_paragraphs {
            let node = DocumentNode::paragraph(text, self.current_level() + 1);
            self.push_node(node);
        } else {
            self.discard_pending();
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        self.add_literal(text);
    }

    fn finish(mut self) -> Result<DocumentNode> {
        self.flush_paragraph();
        while let Some(frame) = self.stack.last() {
            if let Some(delimiter) = &frame.delimiter {
                match self.options.error_mode {
                    ErrorMode::Strict => {
                        return Err(Error::Parse {
                            line: frame.line,
                            message: format!("unterminated block {:?}", delimiter),
                        });
                    }
                    ErrorMode::Lenient => {
                        warn!(
                            "block {:?} opened at line {} is never closed",
                            delimiter, frame.line
                        );
                    }
                }
            }
            self.close_top();
        }
        Ok(self.root)
    }
}
