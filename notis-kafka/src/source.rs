//! Kafka 消息源

use crate::{config::HistoryConfig, errors::KafkaSourceError};
use notis::{
    Record,
    domain::{Polled, Source},
    errors::SourceError,
};
use rdkafka::{
    Message,
    consumer::{BaseConsumer, Consumer},
    message::Headers,
};
use std::time::Duration;
use tracing::{debug, info};

/// 承载事件类型的消息头
pub const EVENT_TYPE_HEADER: &str = "event_type";

/// 基于`BaseConsumer`的单主题消息源
pub struct KafkaSource {
    consumer: Option<BaseConsumer>,
}

impl KafkaSource {
    /// 创建消费者并订阅配置的主题
    pub fn subscribe(cfg: &HistoryConfig) -> Result<Self, KafkaSourceError> {
        let consumer: BaseConsumer = cfg.client_config().create()?;
        consumer.subscribe(&[cfg.topic.as_str()])?;
        info!("成功订阅 {} 主题，消费组：{}", cfg.topic, cfg.group_id);
        Ok(Self {
            consumer: Some(consumer),
        })
    }
}

impl Source for KafkaSource {
    fn poll(&mut self, timeout: Duration) -> Result<Polled, SourceError> {
        let consumer = self.consumer.as_ref().ok_or(SourceError::Closed)?;
        match consumer.poll(timeout) {
            Some(Ok(msg)) => Ok(Polled::Record(to_record(&msg))),
            Some(Err(e)) => Err(KafkaSourceError::from(e).into()),
            None => Ok(Polled::Idle),
        }
    }

    fn ack(&mut self, record: &Record) -> Result<(), SourceError> {
        let consumer = self.consumer.as_ref().ok_or(SourceError::Closed)?;
        let next = i64::try_from(record.offset)
            .ok()
            .and_then(|o| o.checked_add(1))
            .ok_or(KafkaSourceError::Offset(record.offset))?;
        consumer
            .store_offset(&record.topic, record.partition, next)
            .map_err(KafkaSourceError::from)?;
        debug!("存储 {}|{} 偏移 {next}", record.topic, record.partition);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.unsubscribe();
            // 析构时 librdkafka 会提交最后一批已存储的偏移
            drop(consumer);
            info!("关闭 Kafka 消费者");
        }
    }
}

pub(crate) fn to_record<M: Message>(msg: &M) -> Record {
    let event_type = msg.headers().and_then(|headers| {
        headers
            .iter()
            .find(|h| h.key == EVENT_TYPE_HEADER)
            .and_then(|h| h.value)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    });
    Record {
        topic: msg.topic().to_string(),
        partition: msg.partition(),
        offset: u64::try_from(msg.offset()).unwrap_or_default(),
        key: msg.key().map(<[u8]>::to_vec),
        payload: msg.payload().map(<[u8]>::to_vec),
        event_type,
    }
}
