pub const SCHEMA: &str = r#"
-- Points: pins dropped on the map
CREATE TABLE IF NOT EXISTS points (
    id TEXT PRIMARY KEY,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL
);

-- Photos attached to a point, stored under the media directory
CREATE TABLE IF NOT EXISTS photos (
    id TEXT PRIMARY KEY,
    point_id TEXT NOT NULL,
    uri TEXT NOT NULL,
    FOREIGN KEY (point_id) REFERENCES points(id)
);

CREATE INDEX IF NOT EXISTS idx_photos_point ON photos(point_id);
"#;
