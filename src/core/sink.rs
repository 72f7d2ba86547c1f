//! 结果队列定义
//!
//! 宿主与连接器之间的结果投递通道。生产端的 `put` 永不失败
//! （接收端已关闭时结果被静默丢弃），与入口方法"从不抛错"的契约一致。
//! 队列不保证多次 `put` 之间的顺序对消费者可见。

use flume::{Receiver, Sender};

/// 结果投递端
#[derive(Clone)]
pub struct ResultSink<T> {
    tx: Sender<T>,
}

impl<T> ResultSink<T> {
    pub fn new(tx: Sender<T>) -> Self {
        Self { tx }
    }

    /// 投递一条结果
    pub fn put(&self, item: T) {
        let _ = self.tx.send(item);
    }
}

/// 结果接收端
pub struct ResultDrain<T> {
    rx: Receiver<T>,
}

impl<T> ResultDrain<T> {
    pub fn new(rx: Receiver<T>) -> Self {
        Self { rx }
    }

    /// 取出当前已投递的全部结果
    pub fn collect(&self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            out.push(item);
        }
        out
    }
}

/// 创建结果通道
pub fn create_result_channel<T>() -> (ResultSink<T>, ResultDrain<T>) {
    let (tx, rx) = flume::unbounded();
    (ResultSink::new(tx), ResultDrain::new(rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_collect_preserves_local_order() {
        let (sink, drain) = create_result_channel::<u32>();
        sink.put(1);
        sink.put(2);
        sink.put(3);
        assert_eq!(drain.collect(), vec![1, 2, 3]);
        assert!(drain.collect().is_empty());
    }

    #[test]
    fn test_put_after_drain_dropped_is_silent() {
        let (sink, drain) = create_result_channel::<u32>();
        drop(drain);
        sink.put(42);
    }
}
