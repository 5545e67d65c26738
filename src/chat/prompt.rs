// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Write;

use crate::catalog::{Column, SearchResponse};

/// Built-in system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Eres un asistente especializado en autopartes. Ayudas a identificar piezas, \
verificar compatibilidad con marcas, modelos y años de vehículos, y a orientar \
al usuario sobre precios y estado de las piezas.

Tienes acceso a una base de datos de piezas y recuerdas la conversación reciente. \
Cuando recibas información de la base de datos, úsala como fuente principal y no \
inventes datos que no aparezcan en ella. Si faltan detalles del vehículo, pregunta \
por marca, modelo, año y síntomas.

Sé conciso pero informativo en tus respuestas.";

/// Reply shown when a turn fails
pub const FALLBACK_MESSAGE: &str =
    "Lo siento, hubo un error al procesar tu mensaje. Por favor, intenta de nuevo.";

/// Render catalog matches as context for the model. At most `limit` matches
/// are listed, each as a block of labeled fields.
pub fn format_search_context(response: &SearchResponse, limit: usize) -> String {
    if response.total_matches == 0 {
        return format!(
            "No se encontraron resultados para la pieza: {}",
            response.query
        );
    }

    let mut text = format!(
        "Resultados de búsqueda para '{}' ({} coincidencias):\n\n",
        response.query, response.total_matches
    );

    for (i, result) in response.results.iter().take(limit).enumerate() {
        let _ = writeln!(
            text,
            "Resultado {} ({} match en {}):",
            i + 1,
            result.match_type,
            result.matched_column
        );
        for column in Column::ALL {
            let _ = writeln!(text, "  {}: {}", column.label(), column.value(&result.record));
        }
        text.push('\n');
    }

    text
}
