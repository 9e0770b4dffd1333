/// HTML 文本工具
///
/// 终端里不渲染 HTML：去掉标签，再把常见实体还原成字符
use regex::{Captures, Regex};

/// 一个完整的标签，属性值里的 `>` 不会提前结束匹配
const TAG_PATTERN: &str = r#"<(?:"[^"]*"|'[^']*'|[^'">])*>"#;

/// 数字实体，十进制或十六进制
const NUMERIC_ENTITY_PATTERN: &str = r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));";

/// 去掉 HTML 标签并解码实体
pub fn strip_tags(html: &str) -> String {
    let text = match Regex::new(TAG_PATTERN) {
        Ok(re) => re.replace_all(html, "").into_owned(),
        Err(_) => html.to_string(),
    };
    decode_entities(&text).trim().to_string()
}

/// 解码命名实体和数字实体
///
/// `&amp;` 最后处理，`&amp;lt;` 得到的是字面的 `&lt;`
pub fn decode_entities(text: &str) -> String {
    let text = match Regex::new(NUMERIC_ENTITY_PATTERN) {
        Ok(re) => re
            .replace_all(text, |caps: &Captures| {
                let code = match (caps.get(1), caps.get(2)) {
                    (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                    (_, Some(dec)) => dec.as_str().parse().ok(),
                    _ => None,
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        Err(_) => text.to_string(),
    };

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
