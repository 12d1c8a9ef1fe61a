use crate::renderer::block::DocumentationBlock;

/// Per-call walker state, handed down the recursion by value.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub depth: usize,
    /// Output continues the current line instead of starting a new one.
    pub inline: bool,
    pub prefix: String,
}

impl RenderContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            depth: 0,
            inline: false,
            prefix: prefix.into(),
        }
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            inline: self.inline,
            prefix: self.prefix.clone(),
        }
    }

    pub fn nested(&self) -> Self {
        self.with_depth(self.depth + 1)
    }

    pub fn inline(&self) -> Self {
        Self {
            inline: true,
            ..self.clone()
        }
    }

    pub fn block(&self) -> Self {
        Self {
            inline: false,
            ..self.clone()
        }
    }
}

/// Anything that can be written into a documentation block.
pub trait Render {
    fn render(&self, block: &mut DocumentationBlock, context: &RenderContext);
}
