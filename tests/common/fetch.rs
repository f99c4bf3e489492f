#![allow(dead_code)]

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use deferred::script::{Function, Promise, Value};

pub const TITLE: &str = "sunt aut facere repellat provident occaecati excepturi optio reprehenderit";

#[derive(Clone, Debug)]
pub struct Response {
    pub url:  String,
    pub body: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub title: String,
}

impl Response {
    pub async fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

pub fn url(n: impl std::fmt::Display) -> String {
    format!("https://jsonplaceholder.typicode.com/posts/{n}")
}

pub fn payload() -> serde_json::Value {
    json!({ "userId": 1, "id": 1, "title": TITLE })
}

pub async fn fetch(url: String) -> Result<Response> {
    Ok(Response {
        url:  url,
        body: payload().to_string(),
    })
}

pub fn script_fetch() -> Function {
    Function::new(|_args| {
        let json = Function::new(|_| Ok(Promise::resolve(payload()).into()));
        let response = Value::object([("json", json.into())]);
        Ok(Promise::resolve(response).into())
    })
}
