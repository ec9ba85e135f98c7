//! Starter knowledge base written by `storepilot onboard`.

use storepilot_core::knowledge::KnowledgeEntry;

pub fn default_knowledge_base() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            "kb-price",
            "pricing",
            "价格",
            "商品价格以详情页实时显示为准，参加活动时会自动计算优惠后价格。",
        ),
        KnowledgeEntry::new(
            "kb-shipping",
            "logistics",
            "发货",
            "现货商品付款后 48 小时内发货，预售商品按详情页标注的时间发货。",
        ),
        KnowledgeEntry::new(
            "kb-returns",
            "after_sales",
            "退换货",
            "签收后 7 天内支持无理由退换货，商品需保持完好且不影响二次销售。",
        ),
        KnowledgeEntry::new(
            "kb-warranty",
            "after_sales",
            "保修",
            "整机享受一年官方保修，保修期内非人为损坏免费维修。",
        ),
        KnowledgeEntry::new(
            "kb-invoice",
            "billing",
            "发票",
            "支持开具电子普通发票，下单时填写抬头即可，发货后 3 个工作日内开具。",
        ),
    ]
}
