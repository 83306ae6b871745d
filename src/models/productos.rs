// src/models/productos.rs

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::common::normalize::first_present;

const TOP_CATEGORIAS: usize = 5;
const SIN_CATEGORIA: &str = "sin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoriaTop {
    #[schema(example = "3")]
    pub id: String,
    #[schema(example = 12)]
    pub count: usize,
}

// Métricas do módulo de produtos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductosStats {
    pub activos: usize,
    pub inactivos: usize,
    /// Produtos com estoque no mínimo ou abaixo dele
    pub criticos: usize,
    pub categorias_top: Vec<CategoriaTop>,
    pub variantes_por_producto: BTreeMap<String, usize>,
    pub imagenes_por_producto: BTreeMap<String, usize>,
}

impl ProductosStats {
    pub fn compute(productos: &[Value], variantes: &[Value], imagenes: &[Value]) -> Self {
        let activos = productos.iter().filter(|p| is_activo(p)).count();

        let criticos = productos.iter().filter(|p| is_critico(p)).count();

        // Contagem por categoria, preservando a ordem em que apareceram
        let mut por_categoria: Vec<(String, usize)> = Vec::new();
        for producto in productos {
            let id = categoria_id(producto);
            match por_categoria.iter_mut().find(|(cid, _)| *cid == id) {
                Some((_, count)) => *count += 1,
                None => por_categoria.push((id, 1)),
            }
        }
        por_categoria.sort_by(|a, b| b.1.cmp(&a.1));
        let categorias_top = por_categoria
            .into_iter()
            .take(TOP_CATEGORIAS)
            .map(|(id, count)| CategoriaTop { id, count })
            .collect();

        Self {
            activos,
            inactivos: productos.len() - activos,
            criticos,
            categorias_top,
            variantes_por_producto: count_by_producto(variantes),
            imagenes_por_producto: count_by_producto(imagenes),
        }
    }
}

// `estado` manda; sem ele, `activo`; sem nenhum dos dois, ativo.
fn is_activo(producto: &Value) -> bool {
    let Some(map) = producto.as_object() else {
        return false;
    };
    match first_present(map, &["estado", "activo"]) {
        None => true,
        Some(Value::String(s)) => s == "activo",
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => false,
    }
}

fn is_critico(producto: &Value) -> bool {
    let Some(map) = producto.as_object() else {
        return false;
    };
    let stock = map.get("stock").filter(|v| !v.is_null());
    let minimo = first_present(map, &["stock_minimo", "stockMinimo"]);

    // Só compara quando ambos são números de verdade (ausente conta como 0)
    let as_number = |v: Option<&Value>| match v {
        None => Some(0.0),
        Some(v) => v.as_f64(),
    };
    match (as_number(stock), as_number(minimo)) {
        (Some(stock), Some(minimo)) => stock <= minimo,
        _ => false,
    }
}

fn categoria_id(producto: &Value) -> String {
    let direct = producto
        .as_object()
        .and_then(|map| first_present(map, &["id_categoria", "categoria_id"]));
    let nested = || producto.get("categoria").and_then(|c| c.get("id")).filter(|v| !v.is_null());

    direct
        .or_else(nested)
        .and_then(key_of)
        .unwrap_or_else(|| SIN_CATEGORIA.to_string())
}

fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_by_producto(items: &[Value]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        let pid = item
            .as_object()
            .and_then(|map| first_present(map, &["id_producto", "producto_id"]))
            .and_then(key_of);
        if let Some(pid) = pid {
            *counts.entry(pid).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_active_and_inactive() {
        let productos = vec![
            json!({"estado": "activo"}),
            json!({"estado": "inactivo", "activo": true}),
            json!({"activo": true}),
            json!({"activo": false}),
            json!({}),
        ];
        let stats = ProductosStats::compute(&productos, &[], &[]);
        assert_eq!(stats.activos, 3);
        assert_eq!(stats.inactivos, 2);
    }

    #[test]
    fn critical_stock() {
        let productos = vec![
            json!({"stock": 2, "stock_minimo": 5}),
            json!({"stock": 9, "stockMinimo": 5}),
            json!({"stock": 5, "stock_minimo": 5}),
            json!({"stock": "2", "stock_minimo": 5}),
        ];
        let stats = ProductosStats::compute(&productos, &[], &[]);
        assert_eq!(stats.criticos, 2);
    }

    #[test]
    fn top_categories_keep_first_seen_order_on_ties() {
        let productos = vec![
            json!({"id_categoria": 2}),
            json!({"categoria_id": 7}),
            json!({"categoria": {"id": 7}}),
            json!({"id_categoria": 2}),
            json!({"nombre": "sin categoría"}),
            json!({"id_categoria": 3}),
            json!({"id_categoria": 4}),
            json!({"id_categoria": 5}),
        ];
        let stats = ProductosStats::compute(&productos, &[], &[]);
        let ids: Vec<_> = stats.categorias_top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "7", "sin", "3", "4"]);
        assert_eq!(stats.categorias_top[0].count, 2);
    }

    #[test]
    fn groups_variants_and_images_by_product() {
        let variantes = vec![
            json!({"id_producto": 1}),
            json!({"producto_id": 1}),
            json!({"id_producto": "2"}),
            json!({"sin_producto": true}),
        ];
        let imagenes = vec![json!({"id_producto": 2})];
        let stats = ProductosStats::compute(&[], &variantes, &imagenes);
        assert_eq!(stats.variantes_por_producto.get("1"), Some(&2));
        assert_eq!(stats.variantes_por_producto.get("2"), Some(&1));
        assert_eq!(stats.imagenes_por_producto.get("2"), Some(&1));
        assert_eq!(stats.activos, 0);
    }
}
