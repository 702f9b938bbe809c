use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::{FormPayload, FormValue};

pub const METHOD_MAX_LENGTH: usize = 100;
pub const PARAMS_MAX_LENGTH: usize = 1000;

/// Ошибки валидации: имя поля -> список сообщений
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// Форма вызова JSON-RPC метода
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JrpcCallForm {
    /// Имя метода
    pub method: String,
    /// Параметры (текст, не обязательно)
    pub params: String,
}

impl JrpcCallForm {
    /// Из одноимённых полей берётся последнее, пробелы по краям отбрасываются.
    pub fn from_payload(payload: &FormPayload) -> Self {
        let field = |name: &str| {
            payload
                .get_all(name)
                .filter_map(FormValue::as_text)
                .last()
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            method: field("method"),
            params: field("params"),
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.method.is_empty() {
            push_error(&mut errors, "method", "This field is required.".to_string());
        }
        check_max_length(&mut errors, "method", &self.method, METHOD_MAX_LENGTH);
        check_max_length(&mut errors, "params", &self.params, PARAMS_MAX_LENGTH);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_max_length(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    let length = value.chars().count();
    if length > max {
        push_error(
            errors,
            field,
            format!("Ensure this value has at most {max} characters (it has {length})."),
        );
    }
}

fn push_error(errors: &mut FormErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}
