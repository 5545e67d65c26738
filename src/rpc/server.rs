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

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, warn};

use super::sessions::SessionRegistry;
use super::types::{
    parse_params, ChatParams, DetectParams, GetParams, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, SearchParams, SessionParams,
};
use crate::catalog::{detect_identifier, search_source, CatalogFilter, Column};
use crate::chat::ChatSession;

type MethodResult = std::result::Result<Value, JsonRpcError>;

/// Line-delimited JSON-RPC server exposing chat sessions and catalog lookups
pub struct RpcServer {
    registry: SessionRegistry,
}

impl RpcServer {
    pub fn new(registry: SessionRegistry) -> Self {
        Self { registry }
    }

    /// Run the server on stdio
    pub async fn run(&mut self) -> Result<()> {
        let reader = BufReader::new(stdin());
        let mut writer = stdout();
        self.serve(reader, &mut writer).await
    }

    /// Answer one request per input line until EOF
    pub async fn serve<R, W>(&mut self, mut reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                debug!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("Received request: {}", trimmed);

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => JsonRpcResponse::failure(None, JsonRpcError::parse_error(e)),
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }

    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let result = self.dispatch(&request.method, request.params).await;

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => {
                warn!(
                    method = %request.method,
                    code = error.code,
                    message = %error.message,
                    "Request failed"
                );
                JsonRpcResponse::failure(id, error)
            }
        }
    }

    async fn dispatch(&mut self, method: &str, params: Option<Value>) -> MethodResult {
        match method {
            "session/open" => {
                let session_id = self.registry.open();
                Ok(json!({
                    "session_id": session_id.to_string(),
                    "open_sessions": self.registry.len()
                }))
            }
            "session/close" => {
                let params: SessionParams = parse_params(params)?;
                if self.registry.close(&params.session_id) {
                    Ok(json!({ "closed": true }))
                } else {
                    Err(JsonRpcError::unknown_session(&params.session_id))
                }
            }
            "chat" => {
                let params: ChatParams = parse_params(params)?;
                let session = self
                    .registry
                    .get_mut(&params.session_id)
                    .ok_or_else(|| JsonRpcError::unknown_session(&params.session_id))?;
                to_value(&session.chat(&params.message).await)
            }
            "history" => {
                let params: SessionParams = parse_params(params)?;
                let session = self.session(&params.session_id)?;
                Ok(json!({ "messages": to_value(&session.history())? }))
            }
            "clear" => {
                let params: SessionParams = parse_params(params)?;
                let session = self
                    .registry
                    .get_mut(&params.session_id)
                    .ok_or_else(|| JsonRpcError::unknown_session(&params.session_id))?;
                session.clear();
                Ok(json!({ "cleared": true }))
            }
            "stats" => {
                let params: SessionParams = parse_params(params)?;
                to_value(&self.session(&params.session_id)?.stats())
            }
            "export" => {
                let params: SessionParams = parse_params(params)?;
                to_value(&self.session(&params.session_id)?.export())
            }
            "catalog/search" => {
                let params: SearchParams = parse_params(params)?;
                let columns = params.columns.unwrap_or_else(|| Column::ALL.to_vec());
                let response = search_source(
                    self.registry.store(),
                    &self.registry.settings().source_name,
                    &params.query,
                    &columns,
                );
                to_value(&response)
            }
            "catalog/get" => {
                let params: GetParams = parse_params(params)?;
                let catalog = self
                    .registry
                    .store()
                    .load(&self.registry.settings().source_name)
                    .map_err(JsonRpcError::internal)?;
                let record = catalog
                    .find_by_id(&params.id)
                    .ok_or_else(|| JsonRpcError::unknown_part(&params.id))?;
                to_value(record)
            }
            "catalog/filter" => {
                let filter: CatalogFilter = parse_params(params)?;
                let catalog = self
                    .registry
                    .store()
                    .load(&self.registry.settings().source_name)
                    .map_err(JsonRpcError::internal)?;
                let records = filter.apply(&catalog);
                Ok(json!({
                    "total": records.len(),
                    "records": to_value(&records)?
                }))
            }
            "detect" => {
                let params: DetectParams = parse_params(params)?;
                Ok(json!({ "identifier": detect_identifier(&params.message) }))
            }
            _ => Err(JsonRpcError::method_not_found(method)),
        }
    }

    fn session(&self, session_id: &str) -> std::result::Result<&ChatSession, JsonRpcError> {
        self.registry
            .get(session_id)
            .ok_or_else(|| JsonRpcError::unknown_session(session_id))
    }
}

fn to_value<T: Serialize>(value: &T) -> MethodResult {
    serde_json::to_value(value).map_err(JsonRpcError::internal)
}
