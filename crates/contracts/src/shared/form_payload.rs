//! Снимок полей HTML-формы на момент отправки
//!
//! Порядок полей сохраняется, одно имя может встречаться несколько раз
//! (как у `FormData` в браузере).

/// Содержимое файлового поля формы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Значение одного поля формы
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FileBlob),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            FormValue::File(_) => None,
        }
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<FileBlob> for FormValue {
    fn from(value: FileBlob) -> Self {
        FormValue::File(value)
    }
}

/// Упорядоченный мультимап "имя поля -> значение"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<(String, FormValue)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собрать payload из пар (имя, значение) в исходном порядке
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FormValue>,
    {
        let mut payload = Self::new();
        for (name, value) in pairs {
            payload.append(name, value);
        }
        payload
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.append(name, FormValue::Text(value.into()));
    }

    pub fn append_file(&mut self, name: impl Into<String>, file: FileBlob) {
        self.append(name, FormValue::File(file));
    }

    /// Первое значение с таким именем
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FormValue::as_text)
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.fields
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormPayload {
    type Item = &'a (String, FormValue);
    type IntoIter = std::slice::Iter<'a, (String, FormValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order_and_duplicates() {
        let payload = FormPayload::from_pairs([("tag", "a"), ("method", "ping"), ("tag", "b")]);

        let names: Vec<_> = payload.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["tag", "method", "tag"]);

        let tags: Vec<_> = payload.get_all("tag").filter_map(FormValue::as_text).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(payload.get_text("tag"), Some("a"));
        assert_eq!(payload.get_text("missing"), None);
    }

    #[test]
    fn test_value_outlives_lookup_name() {
        let payload = FormPayload::from_pairs([("method", "ping")]);

        let value = {
            let name = String::from("method");
            payload.get(&name)
        };
        assert_eq!(value.and_then(FormValue::as_text), Some("ping"));
    }

    #[test]
    fn test_file_field_is_not_text() {
        let mut payload = FormPayload::new();
        payload.append_file(
            "upload",
            FileBlob {
                file_name: "data.json".to_string(),
                content_type: "application/json".to_string(),
                data: b"{}".to_vec(),
            },
        );

        assert_eq!(payload.len(), 1);
        assert!(payload.get("upload").is_some());
        assert_eq!(payload.get_text("upload"), None);
    }
}
