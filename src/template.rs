//! Template compilation and rendering.
//!
//! The template language has exactly two marker forms: `{= KEY =}`
//! interpolates a configuration value, and `{% STATEMENT %}` opens,
//! continues, or closes a conditional block (`if`/`elif`/`else`/`end`).
//! Everything outside markers is literal text passed through unchanged,
//! newlines and whitespace included. There is no escaping mechanism.
//!
//! Compilation turns the markup into a tree of variant nodes; rendering
//! walks that tree with the configuration mapping as the only variable
//! scope. Block structure errors surface at compile time, missing keys
//! at render time.

use regex::Regex;

use crate::config::{lookup, stringify, Context};
use crate::error::{Error, Result};
use crate::expr::Expr;

/// One node of a compiled template.
#[derive(Debug)]
pub enum Node {
    /// Literal text appended verbatim.
    Literal(String),
    /// A `{= KEY =}` marker, stringified at render time.
    Interpolate(String),
    /// An `if`/`elif`/`else` chain. The first branch whose predicate
    /// holds renders its body; otherwise the fallback body, if any.
    Conditional {
        branches: Vec<(Expr, Vec<Node>)>,
        fallback: Option<Vec<Node>>,
    },
}

impl Node {
    fn render(&self, context: &Context, out: &mut String) -> Result<()> {
        match self {
            Node::Literal(text) => out.push_str(text),
            Node::Interpolate(key) => out.push_str(&stringify(lookup(context, key)?)),
            Node::Conditional { branches, fallback } => {
                for (condition, body) in branches {
                    if condition.test(context)? {
                        return render_body(body, context, out);
                    }
                }
                if let Some(body) = fallback {
                    return render_body(body, context, out);
                }
            }
        }
        Ok(())
    }
}

fn render_body(body: &[Node], context: &Context, out: &mut String) -> Result<()> {
    for node in body {
        node.render(context, out)?;
    }
    Ok(())
}

enum Statement {
    If(Expr),
    Elif(Expr),
    Else,
    End,
}

/// Parses the inside of a `{% ... %}` marker. A trailing `:` is accepted
/// and stripped, so `if pm:` and `if pm` are the same statement.
fn parse_statement(raw: &str) -> Result<Statement> {
    let text = raw.trim();
    let text = text.strip_suffix(':').unwrap_or(text).trim_end();

    if text == "end" {
        return Ok(Statement::End);
    }
    if text == "else" {
        return Ok(Statement::Else);
    }
    if let Some(expr) = text.strip_prefix("if ") {
        return Ok(Statement::If(Expr::parse(expr)?));
    }
    if let Some(expr) = text.strip_prefix("elif ") {
        return Ok(Statement::Elif(Expr::parse(expr)?));
    }
    Err(Error::TemplateSyntax(format!("unknown statement '{}'", raw.trim())))
}

/// An open conditional block under construction.
struct OpenBlock {
    branches: Vec<(Expr, Vec<Node>)>,
    /// Predicate of the branch currently collecting nodes; `None` once
    /// an `else` branch has started.
    condition: Option<Expr>,
    body: Vec<Node>,
}

impl OpenBlock {
    fn finish_branch(&mut self) -> Option<Vec<Node>> {
        let body = std::mem::take(&mut self.body);
        match self.condition.take() {
            Some(condition) => {
                self.branches.push((condition, body));
                None
            }
            None => Some(body),
        }
    }
}

/// A compiled template, ready to be rendered against a configuration
/// mapping. Compiling and rendering are both pure; for a fixed source
/// and mapping the output is exactly reproducible.
#[derive(Debug)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Compiles template markup into an executable node tree.
    ///
    /// # Errors
    /// `Error::TemplateSyntax` on unknown statement shapes, misplaced
    /// `elif`/`else`/`end`, malformed expressions, or blocks left open
    /// at end of input.
    pub fn compile(source: &str) -> Result<Template> {
        // Matches the two marker forms; (?s) lets literal text between
        // markers span lines.
        let markers = Regex::new(r"(?s)\{% (.+?) %\}|\{= (.+?) =\}").unwrap();

        let mut root = Vec::new();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut cursor = 0;

        let emit = |stack: &mut Vec<OpenBlock>, root: &mut Vec<Node>, node: Node| {
            match stack.last_mut() {
                Some(block) => block.body.push(node),
                None => root.push(node),
            }
        };

        for caps in markers.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            if whole.start() > cursor {
                let literal = source[cursor..whole.start()].to_string();
                emit(&mut stack, &mut root, Node::Literal(literal));
            }
            cursor = whole.end();

            if let Some(key) = caps.get(2) {
                emit(&mut stack, &mut root, Node::Interpolate(key.as_str().trim().to_string()));
                continue;
            }

            match parse_statement(&caps[1])? {
                Statement::If(condition) => {
                    stack.push(OpenBlock {
                        branches: Vec::new(),
                        condition: Some(condition),
                        body: Vec::new(),
                    });
                }
                Statement::Elif(condition) => {
                    let block = stack.last_mut().ok_or_else(|| {
                        Error::TemplateSyntax("'elif' outside of a block".to_string())
                    })?;
                    if block.finish_branch().is_some() {
                        return Err(Error::TemplateSyntax(
                            "'elif' after 'else'".to_string(),
                        ));
                    }
                    block.condition = Some(condition);
                }
                Statement::Else => {
                    let block = stack.last_mut().ok_or_else(|| {
                        Error::TemplateSyntax("'else' outside of a block".to_string())
                    })?;
                    if block.finish_branch().is_some() {
                        return Err(Error::TemplateSyntax(
                            "duplicate 'else' in block".to_string(),
                        ));
                    }
                }
                Statement::End => {
                    let mut block = stack.pop().ok_or_else(|| {
                        Error::TemplateSyntax("'end' without an open block".to_string())
                    })?;
                    let fallback = block.finish_branch();
                    let node = Node::Conditional { branches: block.branches, fallback };
                    emit(&mut stack, &mut root, node);
                }
            }
        }

        if !stack.is_empty() {
            return Err(Error::TemplateSyntax(
                "block not properly terminated".to_string(),
            ));
        }

        if cursor < source.len() {
            root.push(Node::Literal(source[cursor..].to_string()));
        }

        Ok(Template { nodes: root })
    }

    /// Renders the compiled template against the configuration mapping.
    ///
    /// # Errors
    /// `Error::UnknownKey` when an interpolation or a conditional
    /// predicate references a key absent from the mapping.
    pub fn render(&self, context: &Context) -> Result<String> {
        let mut out = String::new();
        render_body(&self.nodes, context, &mut out)?;
        Ok(out)
    }
}

/// Convenience wrapper: compile and render in one step.
pub fn render_str(source: &str, context: &Context) -> Result<String> {
    Template::compile(source)?.render(context)
}

/// Rendering capability the materializer depends on. The engine is an
/// explicit constructor argument of the `Processor`, so tests can swap
/// it out.
pub trait Renderer {
    fn render(&self, source: &str, context: &Context) -> Result<String>;
}

/// The stock renderer backed by [`Template`].
pub struct TemplateRenderer;

impl Renderer for TemplateRenderer {
    fn render(&self, source: &str, context: &Context) -> Result<String> {
        render_str(source, context)
    }
}
