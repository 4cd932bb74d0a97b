#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Markup,
    Text,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    html: &'a str,
    pos: usize,
}

pub fn tokenize(html: &str) -> Tokens<'_> {
    Tokens { html, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.html.get(self.pos..)?;
        if rest.is_empty() {
            return None;
        }

        let start = self.pos;
        let (kind, len) = if rest.starts_with('<') {
            match rest[1..].find('>') {
                Some(offset) => (TokenKind::Markup, offset + 2),
                None => (TokenKind::Text, rest.len()),
            }
        } else {
            (TokenKind::Text, rest.find('<').unwrap_or(rest.len()))
        };

        self.pos += len;
        Some(Token {
            kind,
            start,
            text: &rest[..len],
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnchorTag {
    Open { auto_link: bool },
    Close,
}

pub fn anchor_tag(markup: &str, auto_link_class: &str) -> Option<AnchorTag> {
    let inner = markup.strip_prefix('<')?.strip_suffix('>')?;

    if let Some(rest) = inner.strip_prefix('/') {
        return is_anchor_name(rest).then_some(AnchorTag::Close);
    }

    if !is_anchor_name(inner) {
        return None;
    }

    let auto_link = inner.contains(&format!(r#"class="{auto_link_class}""#));
    Some(AnchorTag::Open { auto_link })
}

fn is_anchor_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some('a' | 'A'))
        && chars
            .next()
            .map(|ch| ch.is_whitespace() || ch == '/')
            .unwrap_or(true)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorTracker {
    open: Option<AnchorTag>,
}

impl AnchorTracker {
    pub fn observe(&mut self, markup: &str, auto_link_class: &str) {
        match anchor_tag(markup, auto_link_class) {
            Some(tag @ AnchorTag::Open { .. }) => self.open = Some(tag),
            Some(AnchorTag::Close) => self.open = None,
            None => {}
        }
    }

    pub fn inside_anchor(&self) -> bool {
        self.open.is_some()
    }

    pub fn inside_auto_link(&self) -> bool {
        matches!(self.open, Some(AnchorTag::Open { auto_link: true }))
    }
}
