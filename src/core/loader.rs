use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    convert::{TryFrom, TryInto},
    path::PathBuf,
};

pub struct InputParams {
    params: HashMap<String, InputParamsValue>,
    name: Cow<'static, str>,
    visited_names: HashSet<String>,
    base_path: PathBuf,
}

pub enum InputParamsValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(Vec<InputParamsValue>),
    Object(InputParams),
}

impl InputParamsValue {
    fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }
}

macro_rules! params_get {
    ( $( ( $name:ident, $type:ty, $hint:expr, $extract:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[allow(dead_code)]
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<$type> {
                    if let Some(value) = self.params.get(key) {
                        if let Some(value) = ($extract)(value) {
                            self.visited_names.insert(key.to_owned());
                            return Ok(value);
                        }
                        anyhow::bail!(format!("{} - '{}' should be {}", self.name, key, $hint));
                    }
                    anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](&mut self, key: &str, fallback: $type) -> anyhow::Result<$type> {
                    if self.params.contains_key(key) {
                        self.[<get_ $name>](key)
                    } else {
                        Ok(fallback)
                    }
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _array>](&mut self, key: &str) -> anyhow::Result<Vec<$type>> {
                    if let Some(value) = self.params.get(key) {
                        let error_info = format!("{} - '{}' should be array of {}s", self.name, key, $hint);
                        if let InputParamsValue::Array(arr) = value {
                            let mut result = Vec::with_capacity(arr.len());
                            for ele in arr {
                                match ($extract)(ele) {
                                    Some(ele) => result.push(ele),
                                    None => anyhow::bail!(error_info),
                                }
                            }
                            self.visited_names.insert(key.to_owned());
                            return Ok(result);
                        }
                        anyhow::bail!(error_info);
                    }
                    anyhow::bail!(format!("{} - there is no '{}' field", self.name, key));
                }
            }
        )+
    };
}

impl InputParams {
    pub fn set_name(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn set_base_path(&mut self, path: PathBuf) {
        self.base_path = path;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    params_get! {
        (int, i64, "integer", |v: &InputParamsValue| match v {
            InputParamsValue::Int(v) => Some(*v),
            _ => None,
        }),
        (float, f64, "number", |v: &InputParamsValue| v.as_float()),
        (bool, bool, "boolean", |v: &InputParamsValue| match v {
            InputParamsValue::Bool(v) => Some(*v),
            _ => None,
        }),
        (str, String, "string", |v: &InputParamsValue| match v {
            InputParamsValue::String(v) => Some(v.clone()),
            _ => None,
        }),
    }

    pub fn get_float2(&mut self, key: &str) -> anyhow::Result<[f64; 2]> {
        let arr = self.get_float_array(key)?;
        if arr.len() != 2 {
            anyhow::bail!(format!("{} - '{}' should be array with 2 numbers", self.name, key));
        }
        Ok([arr[0], arr[1]])
    }

    /// Takes a nested object out of the params; it inherits the base path.
    pub fn get_object(&mut self, key: &str) -> anyhow::Result<InputParams> {
        match self.params.remove(key) {
            Some(InputParamsValue::Object(mut object)) => {
                self.visited_names.insert(key.to_owned());
                object.set_base_path(self.base_path.clone());
                object.set_name(format!("{}-{}", self.name, key).into());
                Ok(object)
            }
            Some(value) => {
                self.params.insert(key.to_owned(), value);
                anyhow::bail!(format!("{} - '{}' should be object", self.name, key))
            }
            None => anyhow::bail!(format!("{} - there is no '{}' field", self.name, key)),
        }
    }

    pub fn get_object_array(&mut self, key: &str) -> anyhow::Result<Vec<InputParams>> {
        let error_info = format!("{} - '{}' should be array of objects", self.name, key);
        match self.params.remove(key) {
            Some(InputParamsValue::Array(arr)) => {
                if !arr.iter().all(|v| matches!(v, InputParamsValue::Object(_))) {
                    self.params.insert(key.to_owned(), InputParamsValue::Array(arr));
                    anyhow::bail!(error_info);
                }
                self.visited_names.insert(key.to_owned());
                let mut result = Vec::with_capacity(arr.len());
                for (i, ele) in arr.into_iter().enumerate() {
                    if let InputParamsValue::Object(mut object) = ele {
                        object.set_base_path(self.base_path.clone());
                        object.set_name(format!("{}-{}[{}]", self.name, key, i).into());
                        result.push(object);
                    }
                }
                Ok(result)
            }
            Some(value) => {
                self.params.insert(key.to_owned(), value);
                anyhow::bail!(error_info)
            }
            None => anyhow::bail!(format!("{} - there is no '{}' field", self.name, key)),
        }
    }

    /// Resolves `key` relative to the directory of the loaded file.
    pub fn get_file_path(&mut self, key: &str) -> anyhow::Result<PathBuf> {
        let filename = self.get_str(key)?;
        Ok(self.resolve_path(filename))
    }

    pub fn resolve_path<P: Into<PathBuf>>(&self, path: P) -> PathBuf {
        let path = path.into();
        if path.is_absolute() {
            path
        } else {
            self.base_path.with_file_name(path)
        }
    }

    pub fn check_unused_keys(&self) {
        for k in self.unused_keys() {
            log::warn!("{} - unused key '{}'", self.name, k);
        }
    }

    pub fn unused_keys(&self) -> Vec<&str> {
        self.params
            .keys()
            .filter(|k| !k.starts_with('#') && !self.visited_names.contains(*k))
            .map(|k| k.as_str())
            .collect()
    }
}

impl TryFrom<serde_json::Value> for InputParamsValue {
    type Error = anyhow::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => {
                anyhow::bail!("can't convert to InputParamsValue from null json")
            }
            serde_json::Value::Bool(v) => Ok(Self::Bool(v)),
            serde_json::Value::Number(v) => {
                if let Some(v) = v.as_i64() {
                    Ok(Self::Int(v))
                } else if let Some(v) = v.as_f64() {
                    Ok(Self::Float(v))
                } else {
                    anyhow::bail!(format!("can't represent number {}", v))
                }
            }
            serde_json::Value::String(v) => Ok(Self::String(v)),
            serde_json::Value::Array(arr) => {
                let mut values = Vec::<InputParamsValue>::with_capacity(arr.len());
                for v in arr {
                    match v.try_into() {
                        Ok(v) => values.push(v),
                        Err(e) => {
                            anyhow::bail!(format!("can't convert array element: {}", e))
                        }
                    }
                }
                Ok(Self::Array(values))
            }
            serde_json::Value::Object(_) => Ok(Self::Object(value.try_into()?)),
        }
    }
}

impl TryFrom<serde_json::Value> for InputParams {
    type Error = anyhow::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        if let serde_json::Value::Object(value) = value {
            let mut params = HashMap::<String, InputParamsValue>::with_capacity(value.len());
            for (k, v) in value {
                match v.try_into() {
                    Ok(v) => {
                        params.insert(k, v);
                    }
                    Err(e) => {
                        anyhow::bail!(format!("can't convert member '{}': {}", k, e))
                    }
                }
            }
            Ok(Self {
                params,
                name: Cow::Owned("".to_owned()),
                visited_names: HashSet::new(),
                base_path: PathBuf::default(),
            })
        } else {
            anyhow::bail!("can't convert to InputParams from non-object json value");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    fn params(value: serde_json::Value) -> InputParams {
        let mut params: InputParams = value.try_into().unwrap();
        params.set_name("test".into());
        params
    }

    #[test]
    fn floats_accept_integers() {
        let mut p = params(serde_json::json!({ "lower": 200, "upper": 2000.5 }));
        assert_eq!(p.get_float("lower").unwrap(), 200.0);
        assert_eq!(p.get_float("upper").unwrap(), 2000.5);
        assert!(p.get_int("upper").is_err());
    }

    #[test]
    fn fallbacks_only_apply_to_missing_keys() {
        let mut p = params(serde_json::json!({ "bins": "many" }));
        assert!(p.get_int_or("bins", 30).is_err());
        assert_eq!(p.get_int_or("other", 30).unwrap(), 30);
        assert!(p.get_bool_or("density", true).unwrap());
    }

    #[test]
    fn missing_key_names_the_object() {
        let mut p = params(serde_json::json!({}));
        let err = p.get_str("type").err().unwrap();
        assert_eq!(err.to_string(), "test - there is no 'type' field");
    }

    #[test]
    fn nested_objects_and_arrays() {
        let mut p = params(serde_json::json!({
            "distribution": { "type": "uniform" },
            "parameters": [ { "name": "a" }, { "name": "b" } ],
            "pdf": [1, 2.5, 3],
        }));
        let mut dist = p.get_object("distribution").unwrap();
        assert_eq!(dist.name(), "test-distribution");
        assert_eq!(dist.get_str("type").unwrap(), "uniform");

        let mut list = p.get_object_array("parameters").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].get_str("name").unwrap(), "b");
        assert_eq!(list[0].name(), "test-parameters[0]");

        assert_eq!(p.get_float_array("pdf").unwrap(), vec![1.0, 2.5, 3.0]);
        assert!(p.unused_keys().is_empty());
    }

    #[test]
    fn comment_keys_are_never_unused() {
        let mut p = params(serde_json::json!({ "#note": "x", "bins": 3, "colour": "r" }));
        p.get_int("bins").unwrap();
        assert_eq!(p.unused_keys(), vec!["colour"]);
        p.check_unused_keys();
    }

    #[test]
    fn wrong_shapes_are_rejected_without_consuming() {
        let mut p = params(serde_json::json!({ "plot": 3, "list": [1, {}] }));
        assert!(p.get_object("plot").is_err());
        assert!(p.get_object_array("list").is_err());
        assert!(p.contains_key("plot"));
        assert!(p.contains_key("list"));
        assert_eq!(p.unused_keys().len(), 2);
    }

    #[test]
    fn unused_keys_skip_comments() {
        let mut p = params(serde_json::json!({ "#note": "x", "seed": 1, "extra": true }));
        p.get_int("seed").unwrap();
        assert_eq!(p.unused_keys(), vec!["extra"]);
    }

    #[test]
    fn paths_resolve_next_to_the_file() {
        let mut p = params(serde_json::json!({ "output_dir": "plots" }));
        p.set_base_path(PathBuf::from("/data/configs/run.json"));
        assert_eq!(
            p.get_file_path("output_dir").unwrap(),
            PathBuf::from("/data/configs/plots")
        );
        assert_eq!(p.resolve_path("/tmp/x"), PathBuf::from("/tmp/x"));
    }
}
