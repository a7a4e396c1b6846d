//! Standard rules for document to HTML rendering.

use richdoc_core::{FormatFlag, FormatSet, HeadingStyle, LinkTarget, ListStyle, Node};

use super::{Filter, Rule};
use crate::utilities::{escape_attr, escape_html, wrap};

/// Font sizes for styled headings, level 1 first
const HEADING_SIZES: [&str; 5] = ["2em", "1.5em", "1.25em", "1.1em", "1em"];

/// Create all standard rules
pub fn standard_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        heading_rule(),
        list_rule(),
        wrapper_rule(),
        code_block_rule(),
        link_rule(),
        text_rule(),
        line_break_rule(),
        table_cell_rule(),
        decorator_rule(),
    ]
}

/// Escape `content` and wrap it in one tag per set flag, bold outermost.
pub fn render_text(content: &str, format: &FormatSet) -> String {
    let flags: Vec<FormatFlag> = format.nesting().collect();

    flags
        .into_iter()
        .rev()
        .fold(escape_html(content), |inner, flag| wrap(format_tag(flag), "", &inner))
}

fn format_tag(flag: FormatFlag) -> &'static str {
    match flag {
        FormatFlag::Bold => "strong",
        FormatFlag::Italic => "em",
        FormatFlag::Underline => "u",
        FormatFlag::Strikethrough => "s",
        FormatFlag::Code => "code",
    }
}

fn paragraph_rule() -> Rule {
    Rule::for_kind("paragraph", |node, content, _| {
        // Block media must not end up inside <p>
        let holds_media = node.children().is_some_and(|children| {
            children
                .iter()
                .any(|child| matches!(child, Node::Decorator(decorator) if decorator.is_block()))
        });

        if holds_media {
            content.to_string()
        } else {
            wrap("p", "", content)
        }
    })
}

fn heading_rule() -> Rule {
    Rule::for_kind("heading", |node, content, options| {
        let Node::Heading(heading) = node else {
            return content.to_string();
        };
        let level = heading.effective_level();
        let tag = format!("h{level}");

        match options.heading_style {
            HeadingStyle::Semantic => wrap(&tag, "", content),
            HeadingStyle::Styled => {
                let size = HEADING_SIZES[usize::from(level - 1)];
                let style = format!("style=\"font-size:{size};font-weight:bold\"");
                wrap(&tag, &style, content)
            }
        }
    })
}

fn list_rule() -> Rule {
    Rule::for_kind("list", |node, content, _| {
        let Node::List(list) = node else {
            return content.to_string();
        };

        match list.list_style {
            ListStyle::Unordered => wrap("ul", "", content),
            ListStyle::Ordered => {
                let attrs = list
                    .start
                    .filter(|start| *start != 1)
                    .map(|start| format!("start=\"{start}\""))
                    .unwrap_or_default();
                wrap("ol", &attrs, content)
            }
        }
    })
}

/// Kinds that map to one plain tag
const WRAPPER_TAGS: [(&str, &str); 4] = [
    ("list-item", "li"),
    ("quote", "blockquote"),
    ("table", "table"),
    ("table-row", "tr"),
];

fn wrapper_rule() -> Rule {
    let kinds: Vec<&str> = WRAPPER_TAGS.iter().map(|(kind, _)| *kind).collect();

    Rule::for_kinds(&kinds, |node, content, _| {
        match WRAPPER_TAGS.iter().find(|(kind, _)| *kind == node.kind()) {
            Some((_, tag)) => wrap(tag, "", content),
            None => content.to_string(),
        }
    })
}

fn code_block_rule() -> Rule {
    Rule::for_kind("code-block", |node, content, _| {
        let attrs = match node {
            Node::CodeBlock(code) => code
                .language
                .as_deref()
                .filter(|language| !language.trim().is_empty())
                .map(|language| format!("class=\"language-{}\"", escape_attr(language.trim())))
                .unwrap_or_default(),
            _ => String::new(),
        };
        wrap("pre", "", &wrap("code", &attrs, content))
    })
}

fn link_rule() -> Rule {
    Rule::for_kind("link", |node, content, options| {
        let url = match node {
            Node::Link(link) => link.url.as_str(),
            _ => "",
        };

        let mut attrs = format!("href=\"{}\"", escape_attr(url));
        if options.link_target == LinkTarget::NewWindow {
            attrs.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        wrap("a", &attrs, content)
    })
}

fn text_rule() -> Rule {
    Rule::for_kind("text", |node, _, _| match node {
        Node::Text(text) => render_text(&text.content, &text.format.decode()),
        _ => String::new(),
    })
}

fn line_break_rule() -> Rule {
    Rule::for_kind("line-break", |_, _, options| options.line_break.clone())
}

fn table_cell_rule() -> Rule {
    Rule::for_kind("table-cell", |node, content, _| {
        let header = matches!(node, Node::TableCell(cell) if cell.header);
        wrap(if header { "th" } else { "td" }, "", content)
    })
}

fn decorator_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, _| matches!(node, Node::Decorator(_))),
        |node, _, options| match node {
            Node::Decorator(decorator) => decorator.render(options),
            _ => String::new(),
        },
    )
}
