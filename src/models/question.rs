use serde::{Deserialize, Serialize};

/// 题目
///
/// 同一个索引下加载出来的题目不可变，切换索引时整体替换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 原始 JSON 中的题目 ID，跨多次加载保持不变
    #[serde(rename = "id_original_json", deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(rename = "titulo_original", default)]
    pub title: String,

    #[serde(rename = "enunciado_html", default)]
    pub statement_html: String,

    #[serde(rename = "opcoes", default)]
    pub options: Vec<AnswerOption>,

    #[serde(rename = "resposta_sugerida_letra", default)]
    pub suggested_answer: Option<String>,

    #[serde(default = "default_answers_to_select")]
    pub num_answers_to_select: usize,

    #[serde(rename = "url_original", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(rename = "letra")]
    pub letter: String,

    #[serde(rename = "letra_raw", default, skip_serializing_if = "Option::is_none")]
    pub letter_raw: Option<String>,

    #[serde(rename = "texto", default)]
    pub text: String,

    #[serde(rename = "texto_html", default, skip_serializing_if = "Option::is_none")]
    pub text_html: Option<String>,
}

impl Question {
    /// 必须选择的选项数量，至少为 1
    pub fn required_answers(&self) -> usize {
        self.num_answers_to_select.max(1)
    }

    pub fn is_multi_select(&self) -> bool {
        self.required_answers() > 1
    }

    pub fn option(&self, letter: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.letter == letter)
    }

    pub fn has_option(&self, letter: &str) -> bool {
        self.option(letter).is_some()
    }
}

fn default_answers_to_select() -> usize {
    1
}

// 题目 ID 在部分题库中是数字，统一转成字符串
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer question id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_question_from_api() {
        let body = r#"{
            "id_original_json": "q-101",
            "titulo_original": "Question #101",
            "enunciado_html": "<p>Which services are serverless?</p>",
            "opcoes": [
                {"letra": "A", "texto": "Lambda"},
                {"letra": "B", "texto": "EC2", "texto_html": "<b>EC2</b>"},
                {"letra": "C", "letra_raw": "C.", "texto": "Fargate"}
            ],
            "resposta_sugerida_letra": "AC",
            "num_answers_to_select": 2
        }"#;

        let question: Question = serde_json::from_str(body).unwrap();
        assert_eq!(question.id, "q-101");
        assert_eq!(question.options.len(), 3);
        assert_eq!(question.required_answers(), 2);
        assert!(question.is_multi_select());
        assert_eq!(question.option("C").unwrap().letter_raw.as_deref(), Some("C."));
        assert!(question.source_url.is_none());
    }

    #[test]
    fn test_numeric_id_and_missing_count() {
        let body = r#"{"id_original_json": 42, "opcoes": []}"#;
        let question: Question = serde_json::from_str(body).unwrap();
        assert_eq!(question.id, "42");
        assert_eq!(question.required_answers(), 1);
    }

    #[test]
    fn test_zero_count_is_treated_as_one() {
        let body = r#"{"id_original_json": "x", "num_answers_to_select": 0}"#;
        let question: Question = serde_json::from_str(body).unwrap();
        assert_eq!(question.required_answers(), 1);
    }
}
