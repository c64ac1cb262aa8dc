use std::path::Path;

use crate::param::MIME_TYPES;

/// 处理器回显页面的构建器。
///
/// 正文可能包含任意字节（例如 POST 回显的请求体），因此直接在字节缓冲区上拼接。
pub struct HtmlBuilder {
    body: Vec<u8>,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn heading(mut self, text: &str) -> Self {
        self.push_tagged("h1", text.as_bytes());
        self
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.push_tagged("p", text.as_bytes());
        self
    }

    pub fn preformatted(mut self, raw: &[u8]) -> Self {
        self.push_tagged("pre", raw);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.body
    }

    fn push_tagged(&mut self, tag: &str, content: &[u8]) {
        self.body.extend_from_slice(format!("<{}>", tag).as_bytes());
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(format!("</{}>", tag).as_bytes());
    }
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 对相对路径做纯字面的规范化：折叠空段、`.` 与 `..`。
///
/// 无法再向上折叠的 `..` 会保留在开头，结果为空时返回 `.`。
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            s => parts.push(s),
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// 规范化后的路径是否会跳出服务根目录
pub fn escapes_root(normalized: &str) -> bool {
    normalized.split('/').next() == Some("..")
}

/// 根据扩展名猜测 MIME 类型，无法识别时返回 `None`
pub fn guess_content_type(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?.to_lowercase();
    MIME_TYPES.get(extension.as_str()).copied()
}
