//! Sample knowledge data and the one-shot seeding routine.
//!
//! Seeding only runs against an empty knowledge collection so an operator
//! cannot duplicate the samples by pressing the action twice.

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::error::StoreResult;
use super::knowledge_items::{count_knowledge_items, create_knowledge_item};
use super::models::KnowledgeItem;

/// Result of a seeding attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Whether any items were inserted.
    pub seeded: bool,
    /// Items inserted, or items already present when nothing was done.
    pub count: usize,
}

impl SeedOutcome {
    /// Operator-facing summary for the notification toast.
    pub fn message(&self) -> String {
        if self.seeded {
            format!("Đã thêm {} mục dữ liệu mẫu vào knowledge base thành công!", self.count)
        } else {
            format!(
                "Đã có {} mục trong knowledge base. Không cần thêm dữ liệu mẫu.",
                self.count
            )
        }
    }
}

/// Insert the sample Q&A entries when the collection is empty.
pub async fn seed_knowledge_base(db: &Surreal<Db>) -> StoreResult<SeedOutcome> {
    let existing = count_knowledge_items(db).await?;
    if existing > 0 {
        return Ok(SeedOutcome {
            seeded: false,
            count: existing,
        });
    }

    let items = sample_knowledge_items();
    let mut count = 0;
    for item in &items {
        create_knowledge_item(db, item).await?;
        count += 1;
    }

    log::info!("Seeded {count} sample knowledge items");
    Ok(SeedOutcome {
        seeded: true,
        count,
    })
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// The eight default maritime Q&A entries.
pub fn sample_knowledge_items() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            "Lịch tàu từ Hải Phòng đi Singapore như thế nào?",
            "Tàu từ Hải Phòng đi Singapore khởi hành vào thứ 2 và thứ 5 hàng tuần. Thời gian vận chuyển khoảng 5-7 ngày tùy theo tuyến. Các hãng tàu chính: COSCO, Evergreen, Yang Ming.",
            keywords(&["lịch tàu", "hải phòng", "singapore", "khởi hành"]),
            "Lịch tàu",
        ),
        KnowledgeItem::new(
            "Làm thế nào để tra cứu container?",
            "Để tra cứu container, bạn cần cung cấp số container (VD: MSCU1234567) hoặc số Bill of Lading. Truy cập mục 'Tracking' trên website hoặc liên hệ hotline 1900-xxxx để được hỗ trợ.",
            keywords(&["tra cứu", "container", "tracking", "bill of lading", "theo dõi"]),
            "Tracking",
        ),
        KnowledgeItem::new(
            "Cước vận chuyển từ Việt Nam đi Mỹ bao nhiêu?",
            "Cước vận chuyển từ Việt Nam đi Mỹ (West Coast) dao động từ $2,500 - $4,000/container 20ft và $4,500 - $7,000/container 40ft, tùy thuộc vào hãng tàu và thời điểm. Liên hệ sales@company.com để nhận báo giá chi tiết.",
            keywords(&["cước", "giá", "vận chuyển", "mỹ", "usa", "container", "báo giá"]),
            "Báo giá",
        ),
        KnowledgeItem::new(
            "Thời gian vận chuyển từ Việt Nam đi Châu Âu mất bao lâu?",
            "Thời gian vận chuyển từ Việt Nam đi Châu Âu (các cảng chính như Rotterdam, Hamburg, Antwerp) mất khoảng 25-35 ngày tùy tuyến. Tàu thường transit qua Singapore hoặc Port Klang.",
            keywords(&["thời gian", "châu âu", "rotterdam", "hamburg", "vận chuyển"]),
            "Lịch tàu",
        ),
        KnowledgeItem::new(
            "Quy trình xuất khẩu hàng hóa như thế nào?",
            "Quy trình xuất khẩu: 1) Đặt booking với hãng tàu, 2) Nhận container rỗng, 3) Đóng hàng và niêm seal, 4) Làm thủ tục hải quan, 5) Vận chuyển container đến cảng, 6) Tàu khởi hành. Liên hệ bộ phận chứng từ để được hỗ trợ.",
            keywords(&["quy trình", "xuất khẩu", "thủ tục", "hải quan", "booking"]),
            "Hướng dẫn",
        ),
        KnowledgeItem::new(
            "Các loại container phổ biến là gì?",
            "Các loại container phổ biến: 1) Container 20ft (20GP) - 33 CBM, 2) Container 40ft (40GP) - 67 CBM, 3) Container 40ft High Cube (40HC) - 76 CBM, 4) Container lạnh (Reefer) cho hàng đông lạnh, 5) Open Top cho hàng quá khổ.",
            keywords(&["container", "20ft", "40ft", "loại", "kích thước", "high cube", "reefer"]),
            "Kiến thức",
        ),
        KnowledgeItem::new(
            "Liên hệ hỗ trợ khách hàng như thế nào?",
            "Bạn có thể liên hệ hỗ trợ qua: Hotline 24/7: 1900-xxxx, Email: support@company.com, Zalo: 0909-xxx-xxx. Giờ làm việc: Thứ 2 - Thứ 6 (8:00 - 17:30), Thứ 7 (8:00 - 12:00).",
            keywords(&["liên hệ", "hỗ trợ", "hotline", "email", "điện thoại"]),
            "Hỗ trợ",
        ),
        KnowledgeItem::new(
            "Chính sách bảo hiểm hàng hóa như thế nào?",
            "Chúng tôi cung cấp bảo hiểm hàng hóa với mức phí từ 0.1% - 0.3% giá trị hàng. Bảo hiểm bao gồm: hư hỏng do va đập, ngập nước, mất cắp. Liên hệ bộ phận bảo hiểm để được tư vấn chi tiết.",
            keywords(&["bảo hiểm", "hàng hóa", "insurance", "phí"]),
            "Dịch vụ",
        ),
    ]
}
