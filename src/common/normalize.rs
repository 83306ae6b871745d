// src/common/normalize.rs
//
// A API oficial devolve os mesmos recursos em envelopes diferentes
// (`[...]`, `{data: [...]}`, `{result: [...]}`, ...). Tudo o que precisa
// "adivinhar" formato de resposta fica concentrado aqui.

use serde_json::{Map, Value};

/// Chaves onde listagens costumam vir embrulhadas.
pub const LIST_KEYS: &[&str] = &["data", "users", "result", "results", "items"];

/// Chaves da busca de faturas.
pub const INVOICE_KEYS: &[&str] = &["data", "facturas", "result", "results", "items"];

/// Campos monetários, em ordem de preferência.
pub const AMOUNT_KEYS: &[&str] = &[
    "total",
    "monto",
    "importe_total",
    "precio_total",
    "amount",
    "subtotal",
    "valor",
    "precio",
    "importe",
];

/// Níveis inspecionados pelo extrator de valores: o registro e um nível aninhado.
pub const MAX_AMOUNT_DEPTH: usize = 2;

/// Extrai a lista útil de uma resposta. Nunca falha: sem dados, lista vazia.
pub fn extract_array(raw: &Value, keys: &[&str]) -> Vec<Value> {
    // 1. Array puro tem precedência sobre qualquer chave
    if let Value::Array(items) = raw {
        return items.clone();
    }

    let Value::Object(map) = raw else {
        return Vec::new();
    };

    // 2. Chaves candidatas, na ordem do chamador
    for key in keys {
        if let Some(Value::Array(items)) = map.get(*key) {
            return items.clone();
        }
    }

    // 3. Primeiro valor array do próprio objeto
    map.values()
        .find_map(|v| v.as_array().cloned())
        .unwrap_or_default()
}

/// Número ou string numérica. Strings não numéricas, booleanos e
/// valores não finitos são ignorados.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Valor monetário de um registro; 0 quando nada é encontrado.
pub fn extract_amount(record: &Value) -> f64 {
    find_amount(record, 1).unwrap_or(0.0)
}

fn find_amount(value: &Value, level: usize) -> Option<f64> {
    let map = value.as_object()?;

    // Match direto sempre vence qualquer match aninhado
    if let Some(n) = AMOUNT_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find_map(coerce_number)
    {
        return Some(n);
    }

    if level >= MAX_AMOUNT_DEPTH {
        return None;
    }

    map.values()
        .filter(|v| v.is_object())
        .find_map(|v| find_amount(v, level + 1))
}

pub fn sum_amounts(records: &[Value]) -> f64 {
    records.iter().map(extract_amount).sum()
}

/// Primeiro valor não nulo entre as chaves, na ordem dada.
pub fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

/// `data` quando a resposta o embrulha (mesmo `data: null`), senão a própria resposta.
pub fn unwrap_data(raw: &Value) -> &Value {
    raw.get("data").unwrap_or(raw)
}

/// Verdade "à moda da API": null, false, "", 0 contam como ausência.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
