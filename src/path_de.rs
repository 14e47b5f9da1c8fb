use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        inner: Inner,
    }

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        depth: usize,
    }

    #[test]
    fn error_names_the_failing_field() {
        let err = from_str_with_path::<Outer>(r#"{"inner": {"depth": "deep"}}"#).unwrap_err();
        assert!(err.contains("inner.depth"), "{err}");
    }
}
