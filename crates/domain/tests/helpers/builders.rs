#![allow(dead_code)]
use geodns_domain::{GeoRange, GeoTable, Message, Question, ResourceRecord};

pub struct GeoTableBuilder {
    ranges: Vec<GeoRange>,
}

impl GeoTableBuilder {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn range(mut self, cidr: &str, location: &str) -> Self {
        self.ranges
            .push(GeoRange::parse(&format!("{},{}", cidr, location)).unwrap());
        self
    }

    pub fn build(self) -> GeoTable {
        GeoTable::build(self.ranges)
    }
}

pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn response(id: u16) -> Self {
        let mut message = Message::query(id, Question::a("example.com"), true);
        message.is_query = false;
        Self { message }
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.message.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.message.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.message.additional.push(record);
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
