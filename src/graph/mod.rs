//! Grafo patrocinador → recluta.
//!
//! Se construye con `petgraph` a partir de la tabla normalizada. El builder no
//! valida la estructura: patrocinadores que no aparecen como fila propia se
//! materializan como nodos "desnudos", y se conservan auto-referencias y ciclos.

mod decoration;

pub use decoration::{classify, detail_text, ColorTier};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Palette, Thresholds};
use crate::models::MemberTable;

/// Atributos de un socio declarado en su propia fila.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeAttrs {
    pub label: String,
    pub color: ColorTier,
    pub detail_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberNode {
    pub id: String,
    /// `None` si el nodo sólo existe como patrocinador de otra fila.
    pub attrs: Option<NodeAttrs>,
}

impl MemberNode {
    pub fn is_declared(&self) -> bool {
        self.attrs.is_some()
    }

    pub fn label(&self) -> &str {
        self.attrs.as_ref().map(|a| a.label.as_str()).unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    graph: DiGraph<MemberNode, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        NetworkGraph::default()
    }

    /// Índice del nodo `id`, creándolo sin atributos si no existe.
    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(MemberNode { id: id.to_string(), attrs: None });
        self.node_map.insert(id.to_string(), idx);
        idx
    }

    /// Agrega o actualiza un nodo. Una segunda fila con el mismo id reemplaza
    /// los atributos anteriores.
    pub fn upsert_member(&mut self, id: &str, attrs: NodeAttrs) -> NodeIndex {
        let idx = self.ensure_node(id);
        if self.graph[idx].attrs.is_some() {
            warn!(socio = %id, "número de socio repetido; se conservan los datos de la última fila");
        }
        self.graph[idx].attrs = Some(attrs);
        idx
    }

    pub fn add_sponsorship(&mut self, sponsor_id: &str, member_id: &str) {
        if sponsor_id == member_id {
            debug!(socio = %member_id, "el socio figura como su propio patrocinador");
        }
        let from = self.ensure_node(sponsor_id);
        let to = self.ensure_node(member_id);
        self.graph.add_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&MemberNode> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    #[cfg(test)]
    pub(crate) fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Nodos sin aristas entrantes, en orden de inserción.
    pub fn roots(&self) -> Vec<&MemberNode> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Reclutas directos de `id`, en el orden en que se agregaron las aristas.
    pub fn recruits(&self, id: &str) -> Vec<&MemberNode> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        edges.sort_by_key(|e| e.id());
        edges.into_iter().map(|e| &self.graph[e.target()]).collect()
    }

    /// Patrocinadores referenciados que nunca tuvieron fila propia.
    pub fn bare_nodes(&self) -> Vec<&MemberNode> {
        self.graph
            .node_weights()
            .filter(|n| !n.is_declared())
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MemberNode> {
        self.graph.node_weights()
    }

    /// Aristas como pares (patrocinador, recluta).
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()].id.as_str(), self.graph[e.target()].id.as_str()))
            .collect()
    }

    /// Vista serializable para el renderer (vis-network u otro).
    pub fn to_view(&self, palette: &Palette) -> GraphView {
        let nodes = self
            .graph
            .node_weights()
            .map(|n| match &n.attrs {
                Some(a) => ViewNode {
                    id: n.id.clone(),
                    label: a.label.clone(),
                    color: palette.color_for(a.color).to_string(),
                    title: Some(a.detail_text.clone()),
                },
                None => ViewNode {
                    id: n.id.clone(),
                    label: n.id.clone(),
                    color: palette.bare.clone(),
                    title: None,
                },
            })
            .collect();
        let edges = self
            .edges()
            .into_iter()
            .map(|(from, to)| ViewEdge { from: from.to_string(), to: to.to_string() })
            .collect();
        GraphView { nodes, edges }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

/// Construye el grafo fila por fila. Nunca falla: los campos faltantes ya
/// vienen con su valor por defecto desde el loader.
pub fn build_network(table: &MemberTable, thresholds: &Thresholds) -> NetworkGraph {
    let mut network = NetworkGraph::new();

    for record in table.rows.iter() {
        let color = classify(&record.member_type, record.personal_points, record.inactive_cycles, thresholds);
        let attrs = NodeAttrs {
            label: record.display_name.clone(),
            color,
            detail_text: String::new(),
        };
        network.upsert_member(&record.member_id, attrs);

        if let Some(sponsor) = record.sponsor_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            network.add_sponsorship(sponsor, &record.member_id);
        }
    }

    // El detalle necesita las aristas completas: sin columna de reclutas se usa el grado de salida
    for record in table.rows.iter() {
        let recruits = record
            .recruits
            .unwrap_or_else(|| network.recruits(&record.member_id).len() as u32);
        let text = detail_text(record, recruits);
        if let Some(&idx) = network.node_map.get(&record.member_id) {
            if let Some(attrs) = network.graph[idx].attrs.as_mut() {
                attrs.detail_text = text;
            }
        }
    }

    let bare = network.bare_nodes().len();
    if bare > 0 {
        debug!(patrocinadores_sin_fila = bare, "aristas hacia patrocinadores no declarados");
    }
    info!(nodos = network.node_count(), aristas = network.edge_count(), "grafo construido");
    network
}
