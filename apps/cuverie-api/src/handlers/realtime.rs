//! 实时推送 handler
//!
//! - GET /ws（WebSocket 升级）
//!
//! 连接建立后先推送一帧 `tanks:init`（当前可见储罐），随后把网关
//! 扇出的遥测/配置事件逐条转发给客户端。连接鉴权与客户端分发策略
//! 属于推送层协作方，这里只保证载荷契约。

use crate::AppState;
use crate::handlers::visible_tanks;
use crate::utils::response::{cuverie_to_dto, tank_to_dto};
use api_contract::PushMessageDto;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

pub async fn ws_endpoint(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();

    let tanks = match visible_tanks(&state).await {
        Ok(tanks) => tanks,
        Err(err) => {
            debug!(target: "cuverie.api", "ws init failed: {}", err);
            return;
        }
    };
    let init = PushMessageDto::TanksInit {
        tanks: tanks.into_iter().map(tank_to_dto).collect(),
    };
    if send_message(&mut sender, &init).await.is_err() {
        return;
    }

    let mut telemetry = state.gateway.on_telemetry();
    let mut config = state.gateway.on_config();
    loop {
        tokio::select! {
            event = telemetry.recv() => match event {
                Ok(event) => {
                    let message = PushMessageDto::TanksUpdate {
                        tank: tank_to_dto(event.tank),
                        source: event.source.as_str().to_string(),
                    };
                    if send_message(&mut sender, &message).await.is_err() {
                        break;
                    }
                }
                // 慢客户端漏掉的帧直接跳过，下一帧携带完整储罐状态
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            event = config.recv() => match event {
                Ok(event) => {
                    let message = PushMessageDto::ConfigUpdate {
                        cuveries: event.facilities.into_iter().map(cuverie_to_dto).collect(),
                    };
                    if send_message(&mut sender, &message).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                // 入站帧忽略（推送通道是单向的），连接关闭时退出
                Some(Ok(_)) => continue,
                _ => break,
            },
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &PushMessageDto,
) -> Result<(), ()> {
    let text = serde_json::to_string(message).map_err(|_| ())?;
    sender.send(Message::Text(text)).await.map_err(|_| ())
}
