use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    System,
    Out,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub fn system(text: impl Into<String>) -> Self {
        OutputLine {
            kind: LineKind::System,
            text: text.into(),
        }
    }

    pub fn out(text: impl Into<String>) -> Self {
        OutputLine {
            kind: LineKind::Out,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        OutputLine {
            kind: LineKind::Success,
            text: text.into(),
        }
    }
}

/// Ordered console lines. Lines are only ever appended, or all replaced at
/// once by `reset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<OutputLine>,
}

impl Transcript {
    pub fn new(first: OutputLine) -> Self {
        Transcript { lines: vec![first] }
    }

    pub fn push(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    pub fn reset(&mut self, line: OutputLine) {
        self.lines = vec![line];
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All `out` line texts joined in arrival order.
    pub fn aggregated_output(&self) -> String {
        self.lines
            .iter()
            .filter(|line| line.kind == LineKind::Out)
            .map(|line| line.text.as_str())
            .collect()
    }

    pub fn project(&self, mode: DisplayMode) -> View<'_> {
        let items = match mode {
            DisplayMode::Raw => self.lines.iter().map(ViewItem::Line).collect(),
            DisplayMode::Render => {
                let mut items = vec![];
                let mut math_placed = false;

                for line in &self.lines {
                    if line.kind != LineKind::Out {
                        items.push(ViewItem::Line(line));
                    } else if !math_placed {
                        items.push(ViewItem::Math(MathBlock {
                            source: self.aggregated_output(),
                        }));
                        math_placed = true;
                    }
                }

                items
            }
        };

        View { mode, items }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    #[default]
    Raw,
    Render,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Raw => DisplayMode::Render,
            DisplayMode::Render => DisplayMode::Raw,
        }
    }
}

/// One LaTeX string handed to the math render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathBlock {
    pub source: String,
}

impl MathBlock {
    /// Display-math delimited form.
    pub fn delimited(&self) -> String {
        format!("$${}$$", self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewItem<'a> {
    Line(&'a OutputLine),
    Math(MathBlock),
}

/// Read-only projection of a transcript for one display mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a> {
    pub mode: DisplayMode,
    pub items: Vec<ViewItem<'a>>,
}

impl View<'_> {
    pub fn math(&self) -> Option<&MathBlock> {
        self.items.iter().find_map(|item| match item {
            ViewItem::Math(block) => Some(block),
            ViewItem::Line(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Display for View<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.items {
            match (item, self.mode) {
                (ViewItem::Line(line), DisplayMode::Raw) => writeln!(f, "› {}", line.text)?,
                (ViewItem::Line(line), DisplayMode::Render) => writeln!(f, "{}", line.text)?,
                (ViewItem::Math(block), _) => writeln!(f, "{}", block.delimited())?,
            }
        }

        Ok(())
    }
}
