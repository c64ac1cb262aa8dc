// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 监听循环
//!
//! 串行地接受连接：每个连接被完整地读取、处理、写回并关闭之后，才会接受下一个连接。
//! 单个连接上的任何失败都不会让循环退出。

use crate::{
    config::Config,
    dispatch::{Dispatcher, FileSource},
    framer::read_message,
    request::Request,
};

use log::{debug, error, info, warn};
use std::time::Instant;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpListener,
};

/// 主循环 (Accept Loop)，永不返回。
pub async fn serve<F: FileSource>(listener: TcpListener, dispatcher: Dispatcher<F>, config: Config) {
    match listener.local_addr() {
        Ok(addr) => info!("服务端已在{}上监听Socket连接", addr),
        Err(e) => warn!("无法获取监听地址：{}", e),
    }

    let mut id: u128 = 0;
    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!("接受连接时遇到错误：{}", e);
                continue;
            }
        };
        info!("[ID{}]新的连接：{}", id, addr);

        handle_connection(&mut stream, id, &dispatcher, &config).await;
        debug!("[ID{}]连接已关闭", id);
        id += 1;
    }
}

/// # 连接处理器
///
/// 分帧、解析、分发、写回，然后关闭连接。
/// 报文超限或读取失败时不写回任何字节，直接关闭连接。
pub async fn handle_connection<S, F>(
    stream: &mut S,
    id: u128,
    dispatcher: &Dispatcher<F>,
    config: &Config,
) where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileSource,
{
    let data = match read_message(stream, config.max_message_size(), config.read_chunk_size()).await
    {
        Ok(data) => data,
        Err(e) => {
            warn!("[ID{}]放弃该连接：{}", id, e);
            close(stream, id).await;
            return;
        }
    };
    if data.is_empty() {
        debug!("[ID{}]客户端未发送任何数据即关闭了连接", id);
        close(stream, id).await;
        return;
    }
    debug!("[ID{}]HTTP请求接收完毕，共{}字节", id, data.len());

    let start_time = Instant::now();
    let request = Request::parse(&data);
    let response = dispatcher.dispatch(&request, id);
    debug!(
        "[ID{}]HTTP响应构建完成，服务端用时{}ms。",
        id,
        start_time.elapsed().as_millis()
    );

    info!(
        "[ID{}] {}, {}, {}, {}, {}",
        id,
        or_dash(request.method()),
        or_dash(request.uri()),
        or_dash(request.http_version()),
        response.status_code(),
        response.information(),
    );

    let response_bytes = response.as_bytes();
    debug!("[ID{}]发送全量响应，长度: {}", id, response_bytes.len());
    if let Err(e) = stream.write_all(&response_bytes).await {
        error!("[ID{}]发送响应失败: {}", id, e);
    }
    if let Err(e) = stream.flush().await {
        debug!("[ID{}]刷新输出流失败: {}", id, e);
    }
    close(stream, id).await;
}

async fn close<S: AsyncWrite + Unpin>(stream: &mut S, id: u128) {
    if let Err(e) = stream.shutdown().await {
        debug!("[ID{}]关闭连接失败: {}", id, e);
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
