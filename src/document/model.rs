//! Editable view over a WordprocessingML story (body, header or footer).
//!
//! The model only records where paragraphs, runs and text nodes live in the
//! part's event stream together with the current run text. Formatting,
//! drawings and every other element stay in the event stream untouched.

use std::collections::HashMap;

use quick_xml::events::Event;

use super::xml::{
    PartXml, TextEdit, W_BR, W_CR, W_DRAWING, W_OBJECT, W_P, W_PICT, W_R, W_T, W_TAB, W_TBL,
    W_TC, W_TR,
};
use super::DocumentError;

/// One `w:t` element of a run
#[derive(Debug, Clone)]
pub(crate) struct TextSegment {
    start: usize,
    event: usize,
    text: String,
    dirty: bool,
}

impl TextSegment {
    fn set(&mut self, text: String) {
        if self.text != text {
            self.text = text;
            self.dirty = true;
        }
    }
}

/// Direct content of a run, in document order
#[derive(Debug, Clone)]
pub(crate) enum RunContent {
    Text(TextSegment),
    /// `w:tab` as `\t`, `w:br` and `w:cr` as `\n`. Never edited.
    Break(char),
}

impl RunContent {
    fn as_text(&self) -> Option<&TextSegment> {
        match self {
            RunContent::Text(segment) => Some(segment),
            RunContent::Break(_) => None,
        }
    }

    fn as_text_mut(&mut self) -> Option<&mut TextSegment> {
        match self {
            RunContent::Text(segment) => Some(segment),
            RunContent::Break(_) => None,
        }
    }
}

/// Smallest unit of uniformly formatted content within a paragraph
#[derive(Debug, Clone, Default)]
pub struct Run {
    content: Vec<RunContent>,
    has_drawing: bool,
}

impl Run {
    /// Run text: its `w:t` elements with tabs as `\t` and breaks as `\n`
    pub fn text(&self) -> String {
        let mut text = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(segment) => text.push_str(&segment.text),
                RunContent::Break(c) => text.push(*c),
            }
        }
        text
    }

    /// Whether the run embeds a drawing, picture or OLE object
    pub fn has_drawing(&self) -> bool {
        self.has_drawing
    }

    /// Replace every occurrence of `from` in the run text with `to`.
    ///
    /// Returns the number of occurrences replaced. Occurrences confined to a
    /// single `w:t` element are rewritten in that element. When one straddles
    /// adjacent elements of the same run the whole new text of that stretch is
    /// stored in its first element and the rest are emptied. Occurrences that
    /// cross a tab or break are left alone, so those never move.
    pub fn replace_all(&mut self, from: &str, to: &str) -> usize {
        if from.is_empty() {
            return 0;
        }
        self.content
            .split_mut(|item| matches!(item, RunContent::Break(_)))
            .map(|span| replace_in_span(span, from, to))
            .sum()
    }

    fn segments(&self) -> impl Iterator<Item = &TextSegment> {
        self.content.iter().filter_map(RunContent::as_text)
    }

    fn collect_edits<'a>(&'a self, edits: &mut HashMap<usize, TextEdit<'a>>) {
        for segment in self.segments().filter(|s| s.dirty) {
            edits.insert(
                segment.event,
                TextEdit {
                    start: segment.start,
                    text: &segment.text,
                },
            );
        }
    }
}

/// Replace within `w:t` elements that have no tab or break between them
fn replace_in_span(span: &mut [RunContent], from: &str, to: &str) -> usize {
    let text: String = span
        .iter()
        .filter_map(RunContent::as_text)
        .map(|s| s.text.as_str())
        .collect();
    let total = text.matches(from).count();
    if total == 0 {
        return 0;
    }

    let local: usize = span
        .iter()
        .filter_map(RunContent::as_text)
        .map(|s| s.text.matches(from).count())
        .sum();

    let mut segments = span.iter_mut().filter_map(RunContent::as_text_mut);
    if local == total {
        for segment in segments {
            if segment.text.contains(from) {
                let replaced = segment.text.replace(from, to);
                segment.set(replaced);
            }
        }
    } else {
        if let Some(first) = segments.next() {
            first.set(text.replace(from, to));
        }
        for rest in segments {
            rest.set(String::new());
        }
    }

    total
}

/// A `w:p` element with its direct runs
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    runs: Vec<Run>,
}

impl Paragraph {
    /// Display text of the paragraph, derived from its runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text()).collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn runs_mut(&mut self) -> &mut [Run] {
        &mut self.runs
    }

    fn collect_edits<'a>(&'a self, edits: &mut HashMap<usize, TextEdit<'a>>) {
        for run in &self.runs {
            run.collect_edits(edits);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraphs_mut(&mut self) -> &mut [Paragraph] {
        &mut self.paragraphs
    }
}

#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

/// A `w:tbl` element as a grid of cells
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    fn collect_edits<'a>(&'a self, edits: &mut HashMap<usize, TextEdit<'a>>) {
        for paragraph in self
            .rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.paragraphs.iter())
        {
            paragraph.collect_edits(edits);
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// A part holding block content: the document body, a header or a footer
#[derive(Debug, Clone)]
pub struct Story {
    xml: PartXml,
    blocks: Vec<Block>,
}

impl Story {
    /// Build the story rooted at the first `root` element of the part.
    pub(crate) fn parse(xml: PartXml, root: &[u8]) -> Result<Self, DocumentError> {
        let blocks = {
            let mut cursor = Cursor::new(&xml);
            if !cursor.seek_start(root) {
                return Err(DocumentError::Xml {
                    part: xml.name().to_string(),
                    reason: format!("missing <{}> element", String::from_utf8_lossy(root)),
                });
            }
            cursor.blocks()?
        };
        Ok(Self { xml, blocks })
    }

    pub fn part_name(&self) -> &str {
        self.xml.name()
    }

    /// Paragraphs that are direct children of the story root
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Tables that are direct children of the story root
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Text of every paragraph in document order, table cells included
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => lines.push(p.text()),
                Block::Table(t) => lines.extend(
                    t.rows
                        .iter()
                        .flat_map(|r| r.cells.iter())
                        .flat_map(|c| c.paragraphs.iter())
                        .map(|p| p.text()),
                ),
            }
        }
        lines.join("\n")
    }

    /// Whether any run text changed since parsing
    pub(crate) fn is_dirty(&self) -> bool {
        !self.edits().is_empty()
    }

    pub(crate) fn render(&self) -> Result<Vec<u8>, DocumentError> {
        self.xml.render(&self.edits())
    }

    fn edits(&self) -> HashMap<usize, TextEdit<'_>> {
        let mut edits = HashMap::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => p.collect_edits(&mut edits),
                Block::Table(t) => t.collect_edits(&mut edits),
            }
        }
        edits
    }
}

/// What sits at the cursor position
enum Next {
    Start(Tag),
    Empty(Tag),
    End,
    Other,
    Eof,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tag {
    Paragraph,
    Run,
    Text,
    Table,
    Row,
    Cell,
    Drawing,
    Tab,
    Break,
    Other,
}

impl Tag {
    fn of(name: &[u8]) -> Self {
        match name {
            W_P => Tag::Paragraph,
            W_R => Tag::Run,
            W_T => Tag::Text,
            W_TBL => Tag::Table,
            W_TR => Tag::Row,
            W_TC => Tag::Cell,
            W_DRAWING | W_PICT | W_OBJECT => Tag::Drawing,
            W_TAB => Tag::Tab,
            W_BR | W_CR => Tag::Break,
            _ => Tag::Other,
        }
    }

    /// Character a run-level tab or break contributes to the run text
    fn break_char(self) -> Option<char> {
        match self {
            Tag::Tab => Some('\t'),
            Tag::Break => Some('\n'),
            _ => None,
        }
    }
}

/// Recursive-descent walk over a part's events
struct Cursor<'a> {
    xml: &'a PartXml,
    events: &'a [Event<'static>],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(xml: &'a PartXml) -> Self {
        Self {
            xml,
            events: xml.events(),
            pos: 0,
        }
    }

    fn next(&self) -> Next {
        match self.events.get(self.pos) {
            Some(Event::Start(e)) => Next::Start(Tag::of(e.name().as_ref())),
            Some(Event::Empty(e)) => Next::Empty(Tag::of(e.name().as_ref())),
            Some(Event::End(_)) => Next::End,
            Some(Event::Eof) | None => Next::Eof,
            Some(_) => Next::Other,
        }
    }

    fn truncated(&self) -> DocumentError {
        DocumentError::Xml {
            part: self.xml.name().to_string(),
            reason: "unexpected end of part".to_string(),
        }
    }

    /// Move to the first start tag named `name`
    fn seek_start(&mut self, name: &[u8]) -> bool {
        while let Some(event) = self.events.get(self.pos) {
            if let Event::Start(e) = event {
                if e.name().as_ref() == name {
                    return true;
                }
            }
            self.pos += 1;
        }
        false
    }

    /// Skip the element at the cursor, start tag included
    fn skip(&mut self) -> Result<(), DocumentError> {
        let mut depth = 0usize;
        loop {
            match self.next() {
                Next::Start(_) => depth += 1,
                Next::End => depth = depth.saturating_sub(1),
                Next::Eof => return Err(self.truncated()),
                Next::Empty(_) | Next::Other => {}
            }
            self.pos += 1;
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Visit the direct children of the element whose start tag is at the
    /// cursor. `visit` is called with the cursor on the child's tag and must
    /// consume the child.
    fn children<F>(&mut self, mut visit: F) -> Result<(), DocumentError>
    where
        F: FnMut(&mut Self, Tag, bool) -> Result<(), DocumentError>,
    {
        self.pos += 1;
        loop {
            match self.next() {
                Next::End => {
                    self.pos += 1;
                    return Ok(());
                }
                Next::Start(tag) => visit(self, tag, false)?,
                Next::Empty(tag) => visit(self, tag, true)?,
                Next::Other => self.pos += 1,
                Next::Eof => return Err(self.truncated()),
            }
        }
    }

    fn skip_child(&mut self, empty: bool) -> Result<(), DocumentError> {
        if empty {
            self.pos += 1;
            Ok(())
        } else {
            self.skip()
        }
    }

    fn blocks(&mut self) -> Result<Vec<Block>, DocumentError> {
        let mut blocks = Vec::new();
        self.children(|cur, tag, empty| match (tag, empty) {
            (Tag::Paragraph, false) => {
                blocks.push(Block::Paragraph(cur.paragraph()?));
                Ok(())
            }
            (Tag::Paragraph, true) => {
                blocks.push(Block::Paragraph(Paragraph::default()));
                cur.pos += 1;
                Ok(())
            }
            (Tag::Table, false) => {
                blocks.push(Block::Table(cur.table()?));
                Ok(())
            }
            _ => cur.skip_child(empty),
        })?;
        Ok(blocks)
    }

    fn paragraph(&mut self) -> Result<Paragraph, DocumentError> {
        let mut runs = Vec::new();
        self.children(|cur, tag, empty| match (tag, empty) {
            (Tag::Run, false) => {
                runs.push(cur.run()?);
                Ok(())
            }
            (Tag::Run, true) => {
                runs.push(Run::default());
                cur.pos += 1;
                Ok(())
            }
            _ => cur.skip_child(empty),
        })?;
        Ok(Paragraph { runs })
    }

    fn run(&mut self) -> Result<Run, DocumentError> {
        let mut run = Run::default();
        let mut depth = 0usize;
        self.pos += 1;
        loop {
            match self.next() {
                Next::Start(tag) => {
                    if depth == 0 && tag == Tag::Text {
                        let event = self.pos + 1;
                        run.content.push(RunContent::Text(TextSegment {
                            start: self.pos,
                            event,
                            text: self.xml.text_at(event)?,
                            dirty: false,
                        }));
                    }
                    if let (0, Some(c)) = (depth, tag.break_char()) {
                        run.content.push(RunContent::Break(c));
                    }
                    if tag == Tag::Drawing {
                        run.has_drawing = true;
                    }
                    depth += 1;
                }
                Next::Empty(Tag::Drawing) => run.has_drawing = true,
                Next::Empty(tag) if depth == 0 => {
                    if let Some(c) = tag.break_char() {
                        run.content.push(RunContent::Break(c));
                    }
                }
                Next::End => {
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(run);
                    }
                    depth -= 1;
                }
                Next::Eof => return Err(self.truncated()),
                Next::Empty(_) | Next::Other => {}
            }
            self.pos += 1;
        }
    }

    fn table(&mut self) -> Result<Table, DocumentError> {
        let mut rows = Vec::new();
        self.children(|cur, tag, empty| match (tag, empty) {
            (Tag::Row, false) => {
                rows.push(cur.row()?);
                Ok(())
            }
            _ => cur.skip_child(empty),
        })?;
        Ok(Table { rows })
    }

    fn row(&mut self) -> Result<Row, DocumentError> {
        let mut cells = Vec::new();
        self.children(|cur, tag, empty| match (tag, empty) {
            (Tag::Cell, false) => {
                cells.push(cur.cell()?);
                Ok(())
            }
            _ => cur.skip_child(empty),
        })?;
        Ok(Row { cells })
    }

    fn cell(&mut self) -> Result<Cell, DocumentError> {
        let mut paragraphs = Vec::new();
        self.children(|cur, tag, empty| match (tag, empty) {
            (Tag::Paragraph, false) => {
                paragraphs.push(cur.paragraph()?);
                Ok(())
            }
            (Tag::Paragraph, true) => {
                paragraphs.push(Paragraph::default());
                cur.pos += 1;
                Ok(())
            }
            // nested tables are not part of the cell's own paragraphs
            _ => cur.skip_child(empty),
        })?;
        Ok(Cell { paragraphs })
    }
}
